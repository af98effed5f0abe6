use figment::Jail;
use guest_config::GuestConfig;
use pretty_assertions::assert_eq;

#[test]
fn env_vars_fill_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("WEDDING_S3__BUCKET", "wedding-bucket");
        jail.set_env("WEDDING_S3__PREFIX", "/site/");
        jail.set_env("WEDDING_SERVER__PORT", "9100");
        jail.set_env("WEDDING_GUEST_LIST__PASSWORD", "macbeth");

        let config = GuestConfig::load().expect("config loads");
        assert_eq!(config.s3.bucket, "wedding-bucket");
        assert_eq!(config.s3.key_prefix_with_slash(), "site/");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.guest_list.password, "macbeth");
        Ok(())
    });
}

#[test]
fn toml_file_is_read_and_env_wins() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "wedding.toml",
            r#"
            [s3]
            bucket = "from-toml"
            region = "us-east-2"

            [server]
            concurrency = 4
            "#,
        )?;
        jail.set_env("WEDDING_S3__BUCKET", "from-env");

        let config = GuestConfig::load().expect("config loads");
        assert_eq!(config.s3.bucket, "from-env");
        assert_eq!(config.s3.region, "us-east-2");
        assert_eq!(config.server.fanout(), 4);
        Ok(())
    });
}

#[test]
fn unset_environment_reports_missing() {
    Jail::expect_with(|_jail| {
        let config = GuestConfig::load().expect("config loads");
        assert!(!config.s3.has_bucket());
        assert!(config.missing_variables().contains(&"WEDDING_S3__REGION"));
        Ok(())
    });
}
