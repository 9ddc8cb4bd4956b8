use crate::RequestError;

/// Turns a non-2xx response into a [`RequestError::DownloadError`].
///
/// # Errors
/// If the response status isn't a success code.
pub fn check_for_success(response: &reqwest::Response) -> Result<(), RequestError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(RequestError::DownloadError {
            code: response.status(),
            url: response.url().clone(),
        })
    }
}
