use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::chains;
use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub chain_id: u64,
    pub latest_block: u64,
    pub contract_name: String,
    /// Preset name; the chain id decides when empty.
    pub chain_name: String,
    pub native_symbol: String,
}

impl Header {
    pub fn new(contract_name: impl Into<String>) -> Self {
        Self {
            chain_id: 0,
            latest_block: 0,
            contract_name: contract_name.into(),
            chain_name: String::new(),
            native_symbol: "ETH".to_string(),
        }
    }

    fn display_chain_name(&self) -> &str {
        if self.chain_name.is_empty() {
            chains::chain_name(self.chain_id)
        } else {
            &self.chain_name
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        // title | contract | network
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(14),
                Constraint::Min(0),
                Constraint::Length(36),
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            " greeter-tui",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        let contract = Paragraph::new(Line::from(vec![
            Span::styled("Home", THEME.accent_style().add_modifier(Modifier::BOLD)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(self.contract_name.as_str(), THEME.text_style()),
        ]))
        .style(THEME.header_style());
        frame.render_widget(contract, chunks[1]);

        let block_str = utils::format_number(self.latest_block);
        let network_info = Line::from(vec![
            Span::styled(self.display_chain_name(), THEME.text_style()),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(self.native_symbol.as_str(), THEME.eth_style()),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(format!("#{block_str}"), THEME.accent_style()),
        ]);
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[2]);
    }
}
