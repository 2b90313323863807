use std::io;

use setupgen::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::GenerationError {
        profile: "java-spring".to_string(),
        stage: None,
        message: "disk full".to_string(),
    };
    assert_eq!(err.to_string(), "Generation of profile 'java-spring' failed: disk full");
}
