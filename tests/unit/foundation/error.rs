use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::malformed("x")
            .to_string()
            .contains("malformed graph:")
    );
    assert!(
        ReelError::unreachable("x")
            .to_string()
            .contains("unreachable goal:")
    );
    assert!(ReelError::closed("x").to_string().contains("encoder closed:"));
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReelError::encode("x").to_string().contains("encode error:"));
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn size_mismatch_reports_both_sizes() {
    let err = ReelError::FrameSizeMismatch {
        expected_w: 64,
        expected_h: 48,
        got_w: 32,
        got_h: 48,
    };
    assert_eq!(
        err.to_string(),
        "frame size mismatch: got 32x48, expected 64x48"
    );
}

#[test]
fn step_limit_mentions_limit() {
    let err = ReelError::StepLimitExceeded { limit: 7 };
    assert!(err.to_string().contains("within 7 steps"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: ReelError = parse.unwrap_err().into();
    assert!(matches!(err, ReelError::Serde(_)));
}
