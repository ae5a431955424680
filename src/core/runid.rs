use crate::core::error::IndexError;

pub fn validate(s: &str) -> Result<(), IndexError> {
    if s.trim().is_empty() {
        return Err(IndexError::InvalidInput("run id is empty".into()));
    }
    if s == "." || s == ".." {
        return Err(IndexError::InvalidInput(format!(
            "run id {:?} is not a valid path component",
            s
        )));
    }
    let bytes = s.as_bytes();
    if let Some(pos) = memchr::memchr3(b'/', b'\\', 0, bytes) {
        return Err(IndexError::InvalidInput(format!(
            "run id {:?} contains a path separator at offset {}",
            s, pos
        )));
    }
    if let Some(pos) = bytes.iter().position(|b| b.is_ascii_control()) {
        return Err(IndexError::InvalidInput(format!(
            "run id {:?} contains a control character at offset {}",
            s, pos
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::core::error::IndexError;

    #[test]
    fn accepts_date_and_machine_ids() {
        assert!(validate("150101_RUN01").is_ok());
        assert!(validate("150101_SNL110_0123_AC5LJBACXX").is_ok());
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert!(matches!(validate(""), Err(IndexError::InvalidInput(_))));
        assert!(matches!(validate("   "), Err(IndexError::InvalidInput(_))));
    }

    #[test]
    fn rejects_path_like_ids() {
        for id in [".", "..", "a/b", "a\\b", "../etc", "a\0b", "a\nb"] {
            assert!(
                matches!(validate(id), Err(IndexError::InvalidInput(_))),
                "{:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn html_sensitive_characters_are_left_to_escaping() {
        assert!(validate("run<1>&\"x\"").is_ok());
    }
}
