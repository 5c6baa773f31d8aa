use alloy::primitives::Address;
use ratatui::text::Span;

use crate::theme::THEME;
use crate::utils;

/// Styled, truncated label for an account. Nothing is rendered for `None`.
pub fn address_spans(address: Option<Address>) -> Vec<Span<'static>> {
    match address {
        Some(addr) => vec![Span::styled(
            utils::truncate_address(&addr),
            THEME.address_style(),
        )],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_address_renders_nothing() {
        assert!(address_spans(None).is_empty());
    }

    #[test]
    fn test_present_address_is_truncated() {
        let addr: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
        let spans = address_spans(Some(addr));
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "0xd8dA...6045");
    }
}
