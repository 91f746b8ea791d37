use super::*;

fn code(err: &CoreError) -> String {
    let message = err.to_string();
    message[1..message.find(']').unwrap()].to_string()
}

#[test]
fn test_codes_are_sequential() {
    let io = || std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let errors = vec![
        CoreError::ConfigNotFound { path: "p".into() },
        CoreError::ConfigParseError {
            path: "p".into(),
            message: "m".into(),
        },
        CoreError::ConfigInvalid { message: "m".into() },
        CoreError::MissingField {
            job: "j".into(),
            step: "s".into(),
            field: "f".into(),
        },
        CoreError::InvalidChunkSize {
            job: "j".into(),
            step: "s".into(),
            value: 0,
        },
        CoreError::UnmappedEntity { entity: "e".into() },
        CoreError::UnknownQuery { query: "q".into() },
        CoreError::IncompatibleOptions {
            job: "j".into(),
            step: "s".into(),
            message: "m".into(),
        },
        CoreError::InvalidIdentifier {
            kind: "column",
            name: "n".into(),
        },
        CoreError::DuplicateStep {
            job: "j".into(),
            name: "s".into(),
        },
        CoreError::Io(io()),
        CoreError::IoWithPath {
            path: "p".into(),
            source: io(),
        },
    ];

    let codes: Vec<String> = errors.iter().map(code).collect();
    let expected: Vec<String> = (1..=errors.len()).map(|n| format!("E{n:03}")).collect();
    assert_eq!(codes, expected);
}

#[test]
fn test_io_error_converts() {
    let err: CoreError = std::io::Error::other("disk").into();
    assert!(err.to_string().starts_with("[E011] IO error: disk"));
}
