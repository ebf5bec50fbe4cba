use owo_colors::OwoColorize;
use std::fmt::Debug;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Running,
    Failed,
    Success,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Running => write!(f, "{}", "Running:".yellow()),
            Status::Failed => write!(f, "{}", "Failed:".red()),
            Status::Success => write!(f, "{}", "Success:".green()),
        }
    }
}

pub trait AsyncFn {
    type Future: std::future::Future<Output = anyhow::Result<String>>;
    fn call(self) -> Self::Future;
}

impl<F, Fut> AsyncFn for F
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<String>>,
{
    type Future = Fut;
    fn call(self) -> Self::Future {
        self()
    }
}

struct UiInner {
    message: String,
    status: Status,
}

impl UiInner {
    fn print(&self) {
        if !self.message.is_empty() {
            eprintln!("{} {}", self.status, self.message);
        }
    }
}

impl Debug for UiInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiInner")
            .field("message", &self.message)
            .field("status", &self.status)
            .finish()
    }
}

/// Terminal output of askboxctl.
///
/// Status lines go to stderr so that stdout only carries the requested
/// output (an answer, a table, rendered HTML).
#[derive(Debug)]
pub struct Ui {
    inner: RwLock<UiInner>,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(UiInner {
                message: String::new(),
                status: Status::Running,
            }),
        }
    }

    fn set_status(&self, message: impl AsRef<str>, status: Status) {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Repeating the same line on every poll would only add noise
        if inner.status == status && inner.message == message.as_ref() {
            return;
        }
        inner.message = message.as_ref().into();
        inner.status = status;
        inner.print();
    }

    pub fn new_status_line(&self, message: impl AsRef<str>) {
        self.set_status(message, Status::Running)
    }

    pub fn failed(&self, message: impl AsRef<str>) {
        self.set_status(message, Status::Failed)
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.set_status(message, Status::Success)
    }

    pub fn status(&self) -> Status {
        self.inner
            .read()
            .map(|inner| inner.status)
            .unwrap_or(Status::Failed)
    }

    pub fn println(&self, message: impl AsRef<str>) {
        println!("{}", message.as_ref());
    }

    pub fn eprintln(&self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
    }

    /// Runs `x`, printing its output on success and marking the status
    /// line as failed otherwise.
    pub async fn run<F>(&self, x: F) -> anyhow::Result<()>
    where
        F: AsyncFn,
    {
        match x.call().await {
            Ok(result) => {
                if !result.is_empty() {
                    self.println(result);
                }

                Ok(())
            }
            Err(e) => {
                self.failed(e.to_string());
                Err(e)
            }
        }
    }
}
