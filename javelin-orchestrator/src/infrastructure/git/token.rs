use std::future::Future;

tokio::task_local! {
    static GIT_REQUEST_TOKEN: String;
}

/// Scope a job's hosting token for the lifetime of the provided future.
///
/// The pipeline wraps each job run in this so clone and push can
/// authenticate without the token travelling through every call.
pub async fn with_request_git_token<F, T>(token: String, fut: F) -> T
where
    F: Future<Output = T>,
{
    GIT_REQUEST_TOKEN.scope(token, fut).await
}

/// Retrieve the Git token, if one has been scoped for the current task.
pub fn current_request_git_token() -> Option<String> {
    GIT_REQUEST_TOKEN.try_with(|token| token.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_visible_only_inside_scope() {
        assert_eq!(current_request_git_token(), None);
        let seen = with_request_git_token("ghp_x".to_string(), async {
            current_request_git_token()
        })
        .await;
        assert_eq!(seen.as_deref(), Some("ghp_x"));
        assert_eq!(current_request_git_token(), None);
    }
}
