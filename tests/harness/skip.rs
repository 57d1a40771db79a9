/// Skip a test if AWS credentials or the test secret are not configured.
#[macro_export]
macro_rules! skip_without_aws {
    () => {
        if std::env::var("AWS_ACCESS_KEY_ID").is_err() && std::env::var("AWS_PROFILE").is_err() {
            eprintln!("SKIPPED: AWS credentials not configured");
            return;
        }
        if std::env::var("SIGEX_TEST_AWS_SECRET").is_err() {
            eprintln!(
                "SKIPPED: SIGEX_TEST_AWS_SECRET not set (set to a Secrets Manager secret name or ARN)"
            );
            return;
        }
    };
}
