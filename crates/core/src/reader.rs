//! Readers for provider export files.
//!
//! Two shapes are supported:
//!
//! - a single JSON document (Keycloak realm export), and
//! - a stream of JSON values, usually one per line (Auth0 user and password
//!   exports). Values are decoded back to back, so a value spanning several
//!   lines or several values on one line are both accepted.
//!
//! Both readers load the whole file; a failure anywhere returns no records.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::errors::ReadError;

/// Decode one JSON document from `path`.
pub fn read_json_file<T, P>(path: P) -> Result<T, ReadError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    info!(path = %path.display(), "reading json file");

    let reader = open(path)?;
    serde_json::from_reader(reader).map_err(|source| ReadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode every JSON value in `path`, in file order.
///
/// An empty file yields an empty vector.
pub fn read_json_lines_file<T, P>(path: P) -> Result<Vec<T>, ReadError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    info!(path = %path.display(), "reading json lines file");

    let reader = open(path)?;
    let records = serde_json::Deserializer::from_reader(reader)
        .into_iter::<T>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ReadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), count = records.len(), "decoded json values");
    Ok(records)
}

fn open(path: &Path) -> Result<BufReader<File>, ReadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Message {
        name: String,
        text: String,
    }

    fn msg(name: &str, text: &str) -> Message {
        Message {
            name: name.into(),
            text: text.into(),
        }
    }

    #[test]
    fn test_read_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"Name": "Ed", "Text": "Knock knock."}"#).unwrap();

        let got: Message = read_json_file(&path).unwrap();
        assert_eq!(got, msg("Ed", "Knock knock."));
    }

    #[test]
    fn test_read_json_file_missing() {
        let result = read_json_file::<Message, _>("/nonexistent/doc.json");
        assert!(matches!(result, Err(ReadError::Open { .. })));
    }

    #[test]
    fn test_read_json_file_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, [0xde, 0xad, 0xbe, 0xef, 0x00]).unwrap();

        let result = read_json_file::<Message, _>(&path);
        match result {
            Err(ReadError::Decode { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_json_lines_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.json");
        let stream = r#"
	{"Name": "Ed", "Text": "Knock knock."}
	{"Name": "Sam", "Text": "Who's there?"}
	{"Name": "Ed", "Text": "Go fmt."}
	{"Name": "Sam", "Text": "Go fmt who?"}
	{"Name": "Ed", "Text": "Go fmt yourself!"}"#;
        std::fs::write(&path, stream).unwrap();

        let got: Vec<Message> = read_json_lines_file(&path).unwrap();
        assert_eq!(
            got,
            vec![
                msg("Ed", "Knock knock."),
                msg("Sam", "Who's there?"),
                msg("Ed", "Go fmt."),
                msg("Sam", "Go fmt who?"),
                msg("Ed", "Go fmt yourself!"),
            ]
        );
    }

    #[test]
    fn test_read_json_lines_values_span_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pretty.json");
        let stream = "{\n  \"Name\": \"Ed\",\n  \"Text\": \"a\"\n}{\"Name\":\"Sam\",\"Text\":\"b\"}\n";
        std::fs::write(&path, stream).unwrap();

        let got: Vec<Message> = read_json_lines_file(&path).unwrap();
        assert_eq!(got, vec![msg("Ed", "a"), msg("Sam", "b")]);
    }

    #[test]
    fn test_read_json_lines_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "").unwrap();

        let got: Vec<Message> = read_json_lines_file(&path).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn test_read_json_lines_fails_mid_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(
            &path,
            "{\"Name\":\"Ed\",\"Text\":\"a\"}\n{\"Name\":\"Sam\",\n",
        )
        .unwrap();

        let result = read_json_lines_file::<Message, _>(&path);
        assert!(matches!(result, Err(ReadError::Decode { .. })));
    }

    #[test]
    fn test_read_json_lines_missing() {
        let result = read_json_lines_file::<Message, _>("/nonexistent/lines.json");
        assert!(matches!(result, Err(ReadError::Open { .. })));
    }
}
