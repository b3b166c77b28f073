pub mod audio;
pub mod error;

// Re-export for convenience
pub use audio::*;
pub use error::{AudioError, Result};

/// File name the trimmed result is saved under when none is given
pub const DEFAULT_OUTPUT_NAME: &str = "trimmed_audio.mp3";

/// Read a list of cut ranges from JSON: `[{"start": 1.0, "end": 2.5}, ...]`
pub fn ranges_from_json(json: &str) -> Result<Vec<TimeRange>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_from_json() {
        let ranges = ranges_from_json(r#"[{"start": 2, "end": 4}]"#).unwrap();
        assert_eq!(ranges, vec![TimeRange::new(2.0, 4.0)]);
    }

    #[test]
    fn test_ranges_from_bad_json() {
        assert!(matches!(ranges_from_json("[{\"start\": 2}]"), Err(AudioError::Json(_))));
    }
}
