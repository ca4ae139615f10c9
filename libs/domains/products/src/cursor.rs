//! Continuation tokens for `list`.
//!
//! A token is the number of rows already handed out under `ORDER BY id ASC`
//! and the same search filter. It holds no server-side state.

use crate::error::ProductError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    offset: u64,
}

impl PageCursor {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn at(offset: u64) -> Self {
        Self { offset }
    }

    /// Empty token is the first page. Anything other than a non-negative
    /// integer is rejected.
    pub fn decode(token: &str) -> Result<Self, ProductError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(Self::start());
        }
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProductError::invalid(format!("invalid page token: {token:?}")));
        }
        token
            .parse()
            .map(Self::at)
            .map_err(|_| ProductError::invalid(format!("invalid page token: {token:?}")))
    }

    pub fn encode(&self) -> String {
        self.offset.to_string()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Token for the page after one that returned `returned` rows out of
    /// `page_size`. A short page is the last one.
    pub fn next(&self, returned: usize, page_size: u64) -> Option<PageCursor> {
        let returned = returned as u64;
        (returned > 0 && returned == page_size).then(|| Self::at(self.offset + returned))
    }

    /// `next` rendered as a response token, empty when there is no next page.
    pub fn next_token(&self, returned: usize, page_size: u64) -> String {
        self.next(returned, page_size)
            .map(|cursor| cursor.encode())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_starts_at_zero() {
        assert_eq!(PageCursor::decode("").unwrap().offset(), 0);
        assert_eq!(PageCursor::decode("  ").unwrap(), PageCursor::start());
    }

    #[test]
    fn test_decode_encode() {
        let cursor = PageCursor::decode("40").unwrap();
        assert_eq!(cursor.offset(), 40);
        assert_eq!(cursor.encode(), "40");
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for token in ["-1", "abc", "1.5", "0x10", "99999999999999999999999"] {
            assert!(
                matches!(PageCursor::decode(token), Err(ProductError::InvalidArgument(_))),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_full_page_yields_next_token() {
        let cursor = PageCursor::at(2);
        assert_eq!(cursor.next_token(2, 2), "4");
        assert_eq!(cursor.next(2, 2), Some(PageCursor::at(4)));
    }

    #[test]
    fn test_short_or_empty_page_is_last() {
        let cursor = PageCursor::at(4);
        assert_eq!(cursor.next_token(1, 2), "");
        assert_eq!(cursor.next(0, 2), None);
    }
}
