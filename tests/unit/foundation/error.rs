use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TortugaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TortugaError::config("x").to_string().contains("config error:"));
    assert!(TortugaError::render("x").to_string().contains("render error:"));
    assert!(TortugaError::script("x").to_string().contains("script error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TortugaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
