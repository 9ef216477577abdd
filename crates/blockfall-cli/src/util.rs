use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use serde::Serialize;

/// Writes `value` as pretty-printed JSON to the file at `path`, or to stdout when
/// no path is given. The document always ends with a newline.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let Some(path) = path else {
        return write_pretty(io::stdout().lock(), value).context("Failed to write JSON to stdout");
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))
}

fn write_pretty<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn test_write_pretty() {
        let mut buf = Vec::new();
        write_pretty(&mut buf, &[1, 2, 3]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[\n  1,\n  2,\n  3\n]\n");
    }

    #[test]
    fn test_write_json_to_file() {
        let path = env::temp_dir().join(format!("blockfall-output-{}.json", process::id()));
        write_json(&serde_json::json!({ "score": 7 }), Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(written, "{\n  \"score\": 7\n}\n");
    }

    #[test]
    fn test_write_json_missing_directory() {
        let path = env::temp_dir()
            .join("blockfall-missing-dir")
            .join("nested")
            .join("out.json");
        let err = write_json(&[1], Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create output file"));
        assert!(!path.exists());
    }
}
