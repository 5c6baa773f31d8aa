use std::collections::HashMap;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::components::address::address_spans;
use crate::components::input::TextInput;
use crate::data::history::{EventDisplay, EventHistory};
use crate::data::types::{EventKey, EventRecord, ReadRequest, Session, WriteRequest};
use crate::events::AppEvent;
use crate::theme::THEME;
use crate::utils;

pub const GREETING_FN: &str = "greeting";
pub const DELEGATE_FN: &str = "delegate";
pub const COUNTER_FN: &str = "userGreetingCounter";
pub const SET_GREETING_FN: &str = "setGreeting";
pub const SET_DELEGATE_FN: &str = "setDelegate";
pub const GREETING_EVENT: &str = "GreetingChange";

const SET_GREETING_ERROR: &str = "Error setting greeting";
const SET_DELEGATE_ERROR: &str = "Error delegating";

/// Focusable controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Amount,
    Message,
    SetGreeting,
    Delegate,
    SetDelegate,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Amount,
        Focus::Message,
        Focus::SetGreeting,
        Focus::Delegate,
        Focus::SetDelegate,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    /// True for text fields, false for buttons.
    pub fn is_field(self) -> bool {
        matches!(self, Focus::Amount | Focus::Message | Focus::Delegate)
    }

    /// The submit button of the form this control belongs to.
    fn button(self) -> Self {
        match self {
            Focus::Amount | Focus::Message | Focus::SetGreeting => Focus::SetGreeting,
            Focus::Delegate | Focus::SetDelegate => Focus::SetDelegate,
        }
    }
}

/// The greeter page: three contract reads, two write forms and the
/// `GreetingChange` feed.
pub struct HomePage {
    contract: String,
    session: Session,

    // Contract state, as last reported by the read bindings
    pub greeting: Option<String>,
    pub delegate: Option<Address>,
    pub counter: Option<U256>,
    /// Block each read was last applied at; older results are dropped.
    read_blocks: HashMap<String, u64>,
    pub history: EventHistory,

    // Form state
    pub new_message: TextInput,
    pub new_value: TextInput,
    pub new_delegate: TextInput,

    focus: Focus,
    /// Highlighted event, by identity so live inserts don't move it.
    selected_event: Option<EventKey>,
    list_state: ListState,
}

impl HomePage {
    pub fn new(contract: impl Into<String>, session: Session) -> Self {
        Self {
            contract: contract.into(),
            session,
            greeting: None,
            delegate: None,
            counter: None,
            read_blocks: HashMap::new(),
            history: EventHistory::loading(),
            new_message: TextInput::text("The value to set"),
            new_value: TextInput::amount("0"),
            new_delegate: TextInput::address("Input your address"),
            focus: Focus::Message,
            selected_event: None,
            list_state: ListState::default(),
        }
    }

    /// Whether keystrokes are going into a text field.
    pub fn is_editing(&self) -> bool {
        self.focus.is_field()
    }

    /// The reads this page depends on. The counter read is issued even
    /// without a connected account; its argument is then absent.
    pub fn read_requests(&self, at_block: u64) -> Vec<ReadRequest> {
        let read = |function: &str, args: Vec<Option<DynSolValue>>| ReadRequest {
            contract: self.contract.clone(),
            function: function.to_string(),
            args,
            at_block,
        };
        vec![
            read(GREETING_FN, vec![]),
            read(DELEGATE_FN, vec![]),
            read(
                COUNTER_FN,
                vec![self.session.account.map(DynSolValue::Address)],
            ),
        ]
    }

    /// Store a read result. Values of an unexpected type count as absent.
    /// A result issued at an older block than the one already shown is
    /// ignored.
    pub fn apply_read(&mut self, function: &str, at_block: u64, value: Option<DynSolValue>) {
        if self
            .read_blocks
            .get(function)
            .is_some_and(|&shown| at_block < shown)
        {
            tracing::debug!(%function, at_block, "dropping stale read");
            return;
        }
        self.read_blocks.insert(function.to_string(), at_block);
        match function {
            GREETING_FN => {
                self.greeting = value.and_then(|v| v.as_str().map(str::to_string));
            }
            DELEGATE_FN => {
                self.delegate = value.and_then(|v| v.as_address());
            }
            COUNTER_FN => {
                self.counter = value.and_then(|v| v.as_uint().map(|(n, _)| n));
            }
            _ => {}
        }
    }

    /// Build the `setGreeting` call. A malformed amount is logged and
    /// nothing is sent. Form fields are left as they are.
    pub fn submit_greeting(&self) -> Option<WriteRequest> {
        let value = match utils::parse_amount(self.new_value.value()) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("{SET_GREETING_ERROR}: {e}");
                return None;
            }
        };
        Some(WriteRequest {
            contract: self.contract.clone(),
            function: SET_GREETING_FN.to_string(),
            args: vec![self.new_message.value().to_string()],
            value: Some(value),
            error_context: SET_GREETING_ERROR,
        })
    }

    /// Build the `setDelegate` call. Address validation happens when the
    /// write binding encodes the argument.
    pub fn submit_delegate(&self) -> WriteRequest {
        WriteRequest {
            contract: self.contract.clone(),
            function: SET_DELEGATE_FN.to_string(),
            args: vec![self.new_delegate.value().to_string()],
            value: None,
            error_context: SET_DELEGATE_ERROR,
        }
    }

    /// A write rejected after submission: report it to the log only.
    pub fn on_write_failed(&self, function: &str, context: &str, error: &str) {
        tracing::error!(%function, "{context}: {error}");
    }

    fn submit_current_form(&self) -> Option<AppEvent> {
        match self.focus.button() {
            Focus::SetGreeting => self.submit_greeting().map(AppEvent::Submit),
            _ => Some(AppEvent::Submit(self.submit_delegate())),
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Focus::Amount => Some(&mut self.new_value),
            Focus::Message => Some(&mut self.new_message),
            Focus::Delegate => Some(&mut self.new_delegate),
            Focus::SetGreeting | Focus::SetDelegate => None,
        }
    }

    /// Position of the highlighted event in the current list.
    fn selected_index(&self) -> Option<usize> {
        let key = self.selected_event?;
        self.history.records().iter().position(|r| r.key == key)
    }

    fn scroll_events(&mut self, down: bool) {
        let records = self.history.records();
        if records.is_empty() {
            return;
        }
        let next = match self.selected_index() {
            None => 0,
            Some(current) if down => (current + 1).min(records.len() - 1),
            Some(current) => current.saturating_sub(1),
        };
        self.selected_event = Some(records[next].key);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let mut connected = vec![Span::styled("Connected Address: ", THEME.muted_style())];
        connected.extend(address_spans(self.session.account));

        let counter = self.counter.map(|c| c.to_string()).unwrap_or_default();

        let lines = vec![
            Line::from(Span::styled("Welcome to", THEME.muted_style())),
            Line::from(Span::styled(
                "Scaffold-ETH 2",
                THEME.accent_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(connected),
            Line::from(Span::styled(
                self.greeting.clone().unwrap_or_default(),
                THEME.text_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Counter by address: ", THEME.muted_style()),
                Span::styled(counter, THEME.text_style()),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn render_button(&self, frame: &mut Frame, area: Rect, label: &str, focus: Focus) {
        let focused = self.focus == focus;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                THEME.border_focused_style()
            } else {
                THEME.border_style()
            });
        let button = Paragraph::new(label.to_string())
            .alignment(Alignment::Center)
            .style(THEME.button_style(focused))
            .block(block);
        frame.render_widget(button, area);
    }

    fn render_events(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Events ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.history.display() {
            EventDisplay::Loading => {
                frame.render_widget(
                    Paragraph::new("Loading...").style(THEME.muted_style()),
                    inner,
                );
            }
            EventDisplay::Error(err) => {
                frame.render_widget(
                    Paragraph::new(Line::from(vec![
                        Span::styled("Error: ", THEME.error_style()),
                        Span::styled(err.to_string(), THEME.error_style()),
                    ])),
                    inner,
                );
            }
            EventDisplay::List(records) => {
                let items: Vec<ListItem> = records.iter().map(event_item).collect();
                let list = List::new(items)
                    .highlight_style(THEME.selected_style())
                    .highlight_symbol("> ");
                let selected = self.selected_event.and_then(|key| {
                    records.iter().position(|r| r.key == key)
                });
                self.list_state.select(selected);
                frame.render_stateful_widget(list, inner, &mut self.list_state);
            }
        }
    }
}

/// One feed line: setter, greeting, then whatever metadata was fetched.
fn event_item(record: &EventRecord) -> ListItem<'static> {
    let setter = record.address_arg("greetingSetter");
    let mut spans = address_spans(setter);
    spans.push(Span::styled(" - ", THEME.muted_style()));
    spans.push(Span::styled(
        record.string_arg("newGreeting").unwrap_or_default().to_string(),
        THEME.text_style(),
    ));

    // The transaction value is authoritative; the event argument is the fallback
    let value = record.transaction.map(|tx| tx.value).or_else(|| {
        record
            .arg("value")
            .and_then(DynSolValue::as_uint)
            .map(|(v, _)| v)
    });
    if let Some(value) = value.filter(|v| !v.is_zero()) {
        spans.push(Span::styled(
            format!("  {}", utils::format_eth(value)),
            THEME.eth_style(),
        ));
    }

    if let Some(tx) = record.transaction {
        if setter.is_some_and(|s| s != tx.from) {
            spans.push(Span::styled("  via ", THEME.muted_style()));
            spans.extend(address_spans(Some(tx.from)));
        }
    }

    let mut meta = vec![format!("#{}", utils::format_number(record.key.block_number))];
    if let Some(block) = record.block {
        meta.push(utils::format_time_ago(block.timestamp));
    }
    if let Some(receipt) = record.receipt {
        if receipt.success {
            meta.push(format!("gas {}", utils::format_number(receipt.gas_used)));
        } else {
            meta.push("reverted".to_string());
        }
    }
    spans.push(Span::styled(
        format!("  ({})", meta.join(", ")),
        THEME.hash_style(),
    ));

    ListItem::new(Line::from(spans))
}

impl Component for HomePage {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                None
            }
            KeyCode::Enter => self.submit_current_form(),
            KeyCode::Esc if self.is_editing() => {
                self.focus = self.focus.button();
                None
            }
            KeyCode::Char('j') | KeyCode::Down if !self.is_editing() => {
                self.scroll_events(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up if !self.is_editing() => {
                self.scroll_events(false);
                None
            }
            _ => {
                if let Some(input) = self.focused_input() {
                    input.handle_key(key);
                }
                None
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // welcome + reads
                Constraint::Length(3), // greeting form
                Constraint::Length(1), // delegate
                Constraint::Length(3), // delegate form
                Constraint::Min(3),    // events
            ])
            .split(area);

        self.render_summary(frame, chunks[0]);

        let greeting_form = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(24),
                Constraint::Min(20),
                Constraint::Length(16),
            ])
            .split(chunks[1]);
        self.new_value
            .render(frame, greeting_form[0], "Value", self.focus == Focus::Amount);
        self.new_message.render(
            frame,
            greeting_form[1],
            "Greeting",
            self.focus == Focus::Message,
        );
        self.render_button(frame, greeting_form[2], "Set Greeting", Focus::SetGreeting);

        let mut delegate = vec![Span::styled("Delegate: ", THEME.muted_style())];
        delegate.extend(address_spans(self.delegate));
        frame.render_widget(
            Paragraph::new(Line::from(delegate)).alignment(Alignment::Center),
            chunks[2],
        );

        let delegate_form = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(16)])
            .split(chunks[3]);
        self.new_delegate.render(
            frame,
            delegate_form[0],
            "Delegate address",
            self.focus == Focus::Delegate,
        );
        self.render_button(frame, delegate_form[1], "Set Delegate", Focus::SetDelegate);

        self.render_events(frame, chunks[4]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{EventKey, WalletMode};
    use alloy::primitives::B256;
    use alloy::primitives::utils::parse_ether;
    use crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn account() -> Address {
        Address::repeat_byte(0x11)
    }

    fn page() -> HomePage {
        HomePage::new(
            "YourContract",
            Session {
                account: Some(account()),
                mode: WalletMode::Unlocked,
            },
        )
    }

    fn press(page: &mut HomePage, code: KeyCode) -> Option<AppEvent> {
        page.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(page: &mut HomePage, s: &str) {
        for c in s.chars() {
            press(page, KeyCode::Char(c));
        }
    }

    fn record(block: u64, setter: Address, greeting: &str) -> EventRecord {
        EventRecord {
            key: EventKey {
                block_number: block,
                log_index: 0,
                tx_hash: B256::repeat_byte(block as u8),
            },
            args: vec![
                ("greetingSetter".to_string(), DynSolValue::Address(setter)),
                (
                    "newGreeting".to_string(),
                    DynSolValue::String(greeting.to_string()),
                ),
            ],
            block: None,
            transaction: None,
            receipt: None,
        }
    }

    fn render_lines(page: &mut HomePage) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_typing_updates_only_focused_field() {
        let mut p = page();
        p.focus = Focus::Message;
        type_str(&mut p, "hello");
        assert_eq!(p.new_message.value(), "hello");
        assert!(p.new_value.is_empty());
        assert!(p.new_delegate.is_empty());

        p.focus = Focus::Amount;
        type_str(&mut p, "0.5");
        assert_eq!(p.new_value.value(), "0.5");
        assert_eq!(p.new_message.value(), "hello");

        p.focus = Focus::Delegate;
        type_str(&mut p, "0xabc");
        assert_eq!(p.new_delegate.value(), "0xabc");
        assert_eq!(p.new_message.value(), "hello");
        assert_eq!(p.new_value.value(), "0.5");
    }

    #[test]
    fn test_set_greeting_request() {
        let mut p = page();
        p.focus = Focus::Message;
        type_str(&mut p, "hello");
        p.focus = Focus::Amount;
        type_str(&mut p, "0.01");
        p.focus = Focus::SetGreeting;

        let Some(AppEvent::Submit(request)) = press(&mut p, KeyCode::Enter) else {
            panic!("expected a submit");
        };
        assert_eq!(request.contract, "YourContract");
        assert_eq!(request.function, "setGreeting");
        assert_eq!(request.args, vec!["hello".to_string()]);
        assert_eq!(request.value, Some(parse_ether("0.01").unwrap()));
    }

    #[test]
    fn test_enter_in_field_submits_its_form() {
        let mut p = page();
        p.focus = Focus::Message;
        type_str(&mut p, "hi");
        let event = press(&mut p, KeyCode::Enter);
        assert!(matches!(
            event,
            Some(AppEvent::Submit(WriteRequest { ref function, .. })) if function == "setGreeting"
        ));
    }

    #[test]
    fn test_set_greeting_empty_amount_sends_zero() {
        let p = page();
        let request = p.submit_greeting().unwrap();
        assert_eq!(request.value, Some(U256::ZERO));
        assert_eq!(request.args, vec![String::new()]);
    }

    #[test]
    fn test_set_greeting_bad_amount_sends_nothing() {
        let mut p = page();
        let too_big = "9".repeat(80);
        assert!(p.new_value.set_value(&too_big));
        assert!(p.submit_greeting().is_none());
        assert_eq!(p.new_value.value(), too_big);
    }

    #[test]
    fn test_set_delegate_request() {
        let mut p = page();
        p.focus = Focus::Delegate;
        type_str(&mut p, "0xabc...");
        p.focus = Focus::SetDelegate;

        let Some(AppEvent::Submit(request)) = press(&mut p, KeyCode::Enter) else {
            panic!("expected a submit");
        };
        assert_eq!(request.function, "setDelegate");
        assert_eq!(request.args, vec!["0xabc...".to_string()]);
        assert_eq!(request.value, None);
    }

    #[test]
    fn test_submit_does_not_clear_fields() {
        let mut p = page();
        p.focus = Focus::Message;
        type_str(&mut p, "again");
        let first = p.submit_greeting();
        let second = p.submit_greeting();
        assert_eq!(first, second);
        assert_eq!(p.new_message.value(), "again");
    }

    #[test]
    fn test_write_failure_leaves_form_untouched() {
        let mut p = page();
        p.focus = Focus::Delegate;
        type_str(&mut p, "0xnope");
        p.on_write_failed("setDelegate", "Error delegating", "invalid address");
        assert_eq!(p.new_delegate.value(), "0xnope");
        assert_eq!(p.focus, Focus::Delegate);
    }

    #[test]
    fn test_focus_cycles() {
        let mut p = page();
        p.focus = Focus::SetDelegate;
        press(&mut p, KeyCode::Tab);
        assert_eq!(p.focus, Focus::Amount);
        press(&mut p, KeyCode::BackTab);
        assert_eq!(p.focus, Focus::SetDelegate);
    }

    #[test]
    fn test_esc_leaves_field_for_its_button() {
        let mut p = page();
        p.focus = Focus::Delegate;
        press(&mut p, KeyCode::Esc);
        assert_eq!(p.focus, Focus::SetDelegate);
        assert!(!p.is_editing());
    }

    #[test]
    fn test_read_requests_with_account() {
        let p = page();
        let reads = p.read_requests(0);
        let names: Vec<&str> = reads.iter().map(|r| r.function.as_str()).collect();
        assert_eq!(names, [GREETING_FN, DELEGATE_FN, COUNTER_FN]);
        assert_eq!(reads[2].args, vec![Some(DynSolValue::Address(account()))]);
    }

    #[test]
    fn test_counter_read_issued_without_account() {
        let p = HomePage::new("YourContract", Session::disconnected());
        let reads = p.read_requests(0);
        let counter = reads.iter().find(|r| r.function == COUNTER_FN).unwrap();
        assert_eq!(counter.args, vec![None]);
    }

    #[test]
    fn test_apply_reads() {
        let mut p = page();
        p.apply_read(GREETING_FN, 1, Some(DynSolValue::String("gm".to_string())));
        p.apply_read(DELEGATE_FN, 1, Some(DynSolValue::Address(account())));
        p.apply_read(COUNTER_FN, 1, Some(DynSolValue::Uint(U256::from(4), 256)));
        assert_eq!(p.greeting.as_deref(), Some("gm"));
        assert_eq!(p.delegate, Some(account()));
        assert_eq!(p.counter, Some(U256::from(4)));

        p.apply_read(COUNTER_FN, 1, None);
        assert!(p.counter.is_none());
        p.apply_read(GREETING_FN, 1, Some(DynSolValue::Bool(true)));
        assert!(p.greeting.is_none());
    }

    #[test]
    fn test_stale_read_does_not_overwrite_newer() {
        let mut p = page();
        p.apply_read(GREETING_FN, 5, Some(DynSolValue::String("new".to_string())));
        p.apply_read(GREETING_FN, 4, Some(DynSolValue::String("old".to_string())));
        assert_eq!(p.greeting.as_deref(), Some("new"));

        // other reads keep their own block marks
        p.apply_read(COUNTER_FN, 4, Some(DynSolValue::Uint(U256::from(1), 256)));
        assert_eq!(p.counter, Some(U256::from(1)));

        p.apply_read(GREETING_FN, 5, Some(DynSolValue::String("same".to_string())));
        assert_eq!(p.greeting.as_deref(), Some("same"));
    }

    #[test]
    fn test_render_absent_counter_is_blank() {
        let mut p = HomePage::new("YourContract", Session::disconnected());
        let lines = render_lines(&mut p);
        let counter_line = lines
            .iter()
            .find(|l| l.contains("Counter by address:"))
            .unwrap();
        assert_eq!(counter_line.trim(), "Counter by address:");
    }

    #[test]
    fn test_render_loading_then_list() {
        let mut p = page();
        let lines = render_lines(&mut p);
        assert!(lines.iter().any(|l| l.contains("Loading...")));

        let setter = Address::repeat_byte(0xab);
        p.history.apply(vec![record(3, setter, "hi")]);
        let lines = render_lines(&mut p);
        assert!(!lines.iter().any(|l| l.contains("Loading...")));

        let label = utils::truncate_address(&setter);
        let items: Vec<_> = lines
            .iter()
            .filter(|l| l.contains(&format!("{label} - hi")))
            .collect();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_render_error_hides_list() {
        let mut p = page();
        p.history
            .apply(vec![record(3, Address::repeat_byte(0xab), "hi")]);
        p.history.fail("boom".to_string());
        let lines = render_lines(&mut p);
        assert!(lines.iter().any(|l| l.contains("Error: boom")));
        assert!(!lines.iter().any(|l| l.contains(" - hi")));
    }

    #[test]
    fn test_render_reads() {
        let mut p = page();
        p.apply_read(GREETING_FN, 1, Some(DynSolValue::String("Building Unstoppable Apps!!!".to_string())));
        p.apply_read(COUNTER_FN, 1, Some(DynSolValue::Uint(U256::from(2), 256)));
        let lines = render_lines(&mut p);
        assert!(lines.iter().any(|l| l.contains("Building Unstoppable Apps!!!")));
        assert!(lines.iter().any(|l| l.contains("Counter by address: 2")));
        let connected = utils::truncate_address(&account());
        assert!(lines.iter().any(|l| l.contains(&format!("Connected Address: {connected}"))));
    }

    #[test]
    fn test_render_event_metadata() {
        use crate::data::types::{BlockMeta, ReceiptMeta, TxMeta};

        let mut p = page();
        let setter = Address::repeat_byte(0xab);
        let relayer = Address::repeat_byte(0xcd);
        let mut r = record(1234, setter, "gm");
        r.block = Some(BlockMeta { timestamp: 0 });
        r.transaction = Some(TxMeta {
            from: relayer,
            value: parse_ether("1").unwrap(),
        });
        r.receipt = Some(ReceiptMeta {
            success: true,
            gas_used: 21000,
        });
        p.history.apply(vec![r]);

        let lines = render_lines(&mut p);
        let item = lines.iter().find(|l| l.contains(" - gm")).unwrap();
        assert!(item.contains("1.0 ETH"));
        assert!(item.contains(&format!("via {}", utils::truncate_address(&relayer))));
        assert!(item.contains("#1,234"));
        assert!(item.contains("gas 21,000"));
    }

    #[test]
    fn test_event_scrolling_when_not_editing() {
        let mut p = page();
        p.history.apply(vec![
            record(1, Address::ZERO, "a"),
            record(2, Address::ZERO, "b"),
        ]);
        p.focus = Focus::SetGreeting;
        press(&mut p, KeyCode::Char('j'));
        assert_eq!(p.selected_index(), Some(0));
        press(&mut p, KeyCode::Char('j'));
        press(&mut p, KeyCode::Char('j'));
        assert_eq!(p.selected_index(), Some(1));
        press(&mut p, KeyCode::Char('k'));
        assert_eq!(p.selected_index(), Some(0));
    }

    #[test]
    fn test_selection_follows_record_when_newer_event_arrives() {
        let mut p = page();
        p.history.apply(vec![
            record(1, Address::ZERO, "a"),
            record(2, Address::ZERO, "b"),
        ]);
        p.focus = Focus::SetGreeting;
        press(&mut p, KeyCode::Char('j'));
        let picked = p.selected_event.unwrap();
        assert_eq!(picked.block_number, 2);

        p.history.apply(vec![record(3, Address::ZERO, "c")]);
        render_lines(&mut p);
        assert_eq!(p.selected_event, Some(picked));
        assert_eq!(p.list_state.selected(), Some(1));
    }

    #[test]
    fn test_j_types_into_field_when_editing() {
        let mut p = page();
        p.focus = Focus::Message;
        press(&mut p, KeyCode::Char('j'));
        assert_eq!(p.new_message.value(), "j");
    }
}
