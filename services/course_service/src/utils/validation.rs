/// Checks a video duration label of the form `minutes:seconds`, seconds
/// zero-padded to two digits and below 60 (`12:05`, `0:59`, `120:00`).
pub fn valid_duration(value: &str) -> bool {
    let (minutes, seconds) = match value.split_once(':') {
        Some(parts) => parts,
        None => return false,
    };

    if minutes.is_empty() || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if seconds.len() != 2 || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    // Both digits checked above, the parse cannot fail.
    seconds.parse::<u8>().unwrap() < 60
}

/// Non-empty after trimming; what "required" means for free-form input.
pub fn non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}
