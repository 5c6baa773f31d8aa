use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::types::{Session, TxNotice};
use crate::theme::THEME;
use crate::utils;

pub struct StatusBar {
    pub connected: bool,
    pub latest_block: u64,
    pub error_message: Option<String>,
    pub ws_connected: bool,
    pub session: Session,
    pub tx_notice: Option<TxNotice>,
}

impl StatusBar {
    pub fn new(session: Session) -> Self {
        Self {
            connected: false,
            latest_block: 0,
            error_message: None,
            ws_connected: false,
            session,
            tx_notice: None,
        }
    }

    /// Text of the transaction notification, if one is showing.
    pub fn notice_text(&self) -> Option<String> {
        self.tx_notice.as_ref().map(|notice| match notice {
            TxNotice::Pending { function, hash } => {
                format!("{function}: pending {}", utils::truncate_hash(hash))
            }
            TxNotice::Confirmed {
                function,
                hash,
                success: true,
            } => format!("{function}: confirmed {}", utils::truncate_hash(hash)),
            TxNotice::Confirmed {
                function,
                hash,
                success: false,
            } => format!("{function}: reverted {}", utils::truncate_hash(hash)),
        })
    }

    fn hints(&self) -> Line<'static> {
        let hint = |key: &'static str, label: &'static str| {
            [
                Span::styled(key, Style::default().fg(THEME.text_accent)),
                Span::styled(label, Style::default().fg(THEME.text_muted)),
            ]
        };
        let mut spans = vec![Span::raw(" ")];
        spans.extend(hint("Tab", ":Next  "));
        spans.extend(hint("Enter", ":Submit  "));
        spans.extend(hint("Esc", ":Leave field  "));
        spans.extend(hint("?", ":Help  "));
        spans.extend(hint("q", ":Quit"));
        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(56)])
            .split(area);

        // Left: error, then tx notice, then key hints
        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.clone(), THEME.warning_style()),
            ])
        } else if let Some(text) = self.notice_text() {
            let style = match self.tx_notice {
                Some(TxNotice::Confirmed { success: true, .. }) => THEME.success_style(),
                Some(TxNotice::Confirmed { success: false, .. }) => THEME.error_style(),
                _ => THEME.accent_style(),
            };
            Line::from(Span::styled(format!(" {text}"), style))
        } else {
            self.hints()
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        // Right: wallet, WS, connection, block
        let (dot_color, status_text) = if self.connected {
            (THEME.success, "Connected")
        } else {
            (THEME.error, "Disconnected")
        };

        let (ws_color, ws_text) = if self.ws_connected {
            (THEME.success, "WS")
        } else {
            (THEME.text_muted, "WS:--")
        };

        let block_str = utils::format_number(self.latest_block);

        let right_content = Line::from(vec![
            Span::styled(self.session.mode.to_string(), THEME.muted_style()),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(ws_text, Style::default().fg(ws_color)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(format!("#{block_str} "), THEME.accent_style()),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
