use serde::Deserialize;

/// User-facing strings shown by the task tracker.
///
/// The three failure messages stay distinct so that a reader can tell
/// which branch ended the task.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    pub working: String,
    pub submit_failed: String,
    pub result_ready: String,
    pub job_failed: String,
    pub status_failed: String,
    pub no_answer: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            working: "Working on your request".to_string(),
            submit_failed: "Could not send the request. Please try again.".to_string(),
            result_ready: "Result ready".to_string(),
            job_failed: "The request finished with an error.".to_string(),
            status_failed: "Failed to fetch the task status.".to_string(),
            no_answer: "No answer found.".to_string(),
        }
    }
}
