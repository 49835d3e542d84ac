use crate::AppResult;
use console::Term;
use indicatif::ProgressBar;

/// Handle passed explicitly to everything that reports progress.
///
/// Each message goes to the log file through `tracing` and to the user either on the
/// terminal or above the active progress bar.
#[derive(Debug, Clone)]
pub struct AppReporter {
    inner: AppReporterInner,
}

impl AppReporter {
    pub fn report<S>(&self, message: S) -> AppResult<()>
    where
        S: AsRef<str>,
    {
        tracing::info!("{}", console::strip_ansi_codes(message.as_ref()));
        self.print(message)
    }

    pub fn report_error<S>(&self, message: S) -> AppResult<()>
    where
        S: AsRef<str>,
    {
        tracing::error!("{}", console::strip_ansi_codes(message.as_ref()));
        self.print(message)
    }

    pub fn debug<S>(&self, message: S)
    where
        S: AsRef<str>,
    {
        tracing::debug!("{}", message.as_ref());
    }

    pub fn silent() -> Self {
        AppReporter {
            inner: AppReporterInner::Silent,
        }
    }

    fn print<S>(&self, message: S) -> AppResult<()>
    where
        S: AsRef<str>,
    {
        match &self.inner {
            AppReporterInner::Term(term) => Ok(term.write_line(message.as_ref())?),
            AppReporterInner::ProgressBar(progress_bar) => {
                progress_bar.println(message.as_ref());
                Ok(())
            }
            AppReporterInner::Silent => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
enum AppReporterInner {
    Term(Term),
    ProgressBar(ProgressBar),
    Silent,
}

impl From<&Term> for AppReporter {
    fn from(term: &Term) -> Self {
        AppReporter {
            inner: AppReporterInner::Term(term.clone()),
        }
    }
}

impl From<&ProgressBar> for AppReporter {
    fn from(progress_bar: &ProgressBar) -> Self {
        AppReporter {
            inner: AppReporterInner::ProgressBar(progress_bar.clone()),
        }
    }
}
