use super::*;

#[test]
fn second_init_reports_already_installed() {
    let config = Config::default();
    init(&config);
    assert!(!init(&config));
}

