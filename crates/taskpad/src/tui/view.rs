use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use unicode_segmentation::UnicodeSegmentation;

use taskpad_app::{Reconciler, TaskStore};
use taskpad_core::{Task, TaskId};

use super::constants::UI_MESSAGE_TTL_SECS;
use super::list_view::ListView;

const CREATED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Add-task affordance: either idle or holding a draft title.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) enum Composer {
    #[default]
    Idle,
    Composing {
        draft: String,
    },
}

impl Composer {
    pub(super) fn start(&mut self) {
        *self = Self::Composing {
            draft: String::new(),
        };
    }

    pub(super) fn dismiss(&mut self) {
        *self = Self::Idle;
    }

    pub(super) const fn is_composing(&self) -> bool {
        matches!(self, Self::Composing { .. })
    }
}

/// Per-row edit mode. At most one row edits at a time; starting a new edit
/// abandons any other in-progress draft unsaved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) enum RowEditor {
    #[default]
    Viewing,
    Editing {
        id: TaskId,
        draft: String,
    },
}

impl RowEditor {
    /// Enter edit mode for a row, seeding the draft with its current title.
    pub(super) fn start(&mut self, task: &Task) {
        *self = Self::Editing {
            id: task.id,
            draft: task.title.clone(),
        };
    }

    /// Discard the draft unchanged.
    pub(super) fn cancel(&mut self) {
        *self = Self::Viewing;
    }

    pub(super) const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageLevel {
    Info,
    Error,
}

struct Message {
    text: String,
    level: MessageLevel,
    expires_at: Instant,
}

/// TUI state shared between the event loop and rendering.
pub(super) struct Ui<S> {
    pub(super) reconciler: Reconciler<S>,
    pub(super) list: ListView,
    pub(super) composer: Composer,
    pub(super) editor: RowEditor,
    message: Option<Message>,
    pub(super) should_quit: bool,
}

impl<S: TaskStore> Ui<S> {
    const LIST_MIN_HEIGHT: u16 = 5;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    /// Wrap an already-synced reconciler.
    pub(super) fn new(reconciler: Reconciler<S>) -> Self {
        let mut ui = Self {
            reconciler,
            list: ListView::default(),
            composer: Composer::default(),
            editor: RowEditor::default(),
            message: None,
            should_quit: false,
        };
        ui.rebuild_list(None);
        ui
    }

    pub(super) fn info(&mut self, text: impl Into<String>) {
        self.set_message(text.into(), MessageLevel::Info);
    }

    pub(super) fn error(&mut self, text: impl Into<String>) {
        self.set_message(text.into(), MessageLevel::Error);
    }

    fn set_message(&mut self, text: String, level: MessageLevel) {
        self.message = Some(Message {
            text,
            level,
            expires_at: Instant::now() + Duration::from_secs(UI_MESSAGE_TTL_SECS),
        });
    }

    /// Clear expired status messages.
    pub(super) fn tick(&mut self) {
        if let Some(message) = &self.message
            && message.expires_at <= Instant::now()
        {
            self.message = None;
        }
    }

    fn rebuild_list(&mut self, preferred: Option<TaskId>) {
        self.list
            .rebuild(self.reconciler.snapshot().tasks(), preferred);
    }

    /// Re-fetch the task list and rebuild the view.
    pub(super) fn refresh(&mut self) {
        let keep = self.list.selected_task_id(self.reconciler.snapshot().tasks());
        match self.reconciler.sync() {
            Ok(()) => self.rebuild_list(keep),
            Err(err) => self.error(format!("refresh failed: {err}")),
        }
    }

    pub(super) fn cycle_filter(&mut self) {
        let keep = self.list.selected_task_id(self.reconciler.snapshot().tasks());
        let next = self.list.filter().cycled();
        self.list.set_filter(next);
        self.rebuild_list(keep);
    }

    fn start_edit_selected(&mut self) {
        let Some(task) = self.list.selected_task(self.reconciler.snapshot().tasks()) else {
            self.info("no task selected");
            return;
        };
        self.editor.start(task);
    }

    fn submit_compose(&mut self) {
        let Composer::Composing { draft } = self.composer.clone() else {
            return;
        };
        if draft.trim().is_empty() {
            // Matches the add affordance: a blank submit stays in compose mode.
            self.info("enter a title first");
            return;
        }
        match self.reconciler.add_task(&draft) {
            Ok(Some(task)) => {
                let id = task.id;
                self.info(format!("added task {id}"));
                self.composer.dismiss();
                self.rebuild_list(Some(id));
            }
            Ok(None) => self.info("enter a title first"),
            Err(err) => self.error(format!("add failed: {err}")),
        }
    }

    fn save_edit(&mut self) {
        let RowEditor::Editing { id, draft } = self.editor.clone() else {
            return;
        };
        if draft.trim().is_empty() {
            self.info("title must not be empty");
            return;
        }
        match self.reconciler.edit_title(id, &draft) {
            Ok(true) => {
                self.editor.cancel();
                self.info(format!("renamed task {id}"));
                self.rebuild_list(Some(id));
            }
            Ok(false) => {
                self.editor.cancel();
                self.info(format!("task {id} is no longer present"));
                self.refresh();
            }
            Err(err) => self.error(format!("rename failed: {err}")),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.list.selected_task_id(self.reconciler.snapshot().tasks()) else {
            return;
        };
        match self.reconciler.toggle_completion(id) {
            Ok(true) => self.rebuild_list(Some(id)),
            Ok(false) => {
                self.info(format!("task {id} is no longer present"));
                self.refresh();
            }
            Err(err) => self.error(format!("toggle failed: {err}")),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.list.selected_task_id(self.reconciler.snapshot().tasks()) else {
            return;
        };
        match self.reconciler.delete_task(id) {
            Ok(()) => {
                self.info(format!("deleted task {id}"));
                self.rebuild_list(None);
            }
            Err(err) => self.error(format!("delete failed: {err}")),
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.composer.is_composing() {
            self.handle_compose_key(key);
        } else if self.editor.is_editing() {
            self.handle_edit_key(key);
        } else {
            self.handle_browse_key(key);
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.composer.dismiss(),
            KeyCode::Enter => self.submit_compose(),
            KeyCode::Backspace => {
                if let Composer::Composing { draft } = &mut self.composer {
                    draft.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Composer::Composing { draft } = &mut self.composer {
                    draft.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.editor.cancel(),
            KeyCode::Enter => self.save_edit(),
            KeyCode::Backspace => {
                if let RowEditor::Editing { draft, .. } = &mut self.editor {
                    draft.pop();
                }
            }
            KeyCode::Char(c) => {
                if let RowEditor::Editing { draft, .. } = &mut self.editor {
                    draft.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.list.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.list.select_prev(),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('a') => self.composer.start(),
            KeyCode::Char('e') => self.start_edit_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(Self::LIST_MIN_HEIGHT),
                Constraint::Length(Self::INPUT_HEIGHT),
                Constraint::Length(Self::STATUS_HEIGHT),
            ])
            .split(f.area());

        self.draw_list(f, chunks[0]);
        self.draw_input(f, chunks[1]);
        self.draw_status(f, chunks[2]);
    }

    fn draw_list(&self, f: &mut Frame<'_>, area: Rect) {
        let snapshot = self.reconciler.snapshot();
        let title = format!(
            " tasks [{}] {}/{} ",
            self.list.filter(),
            self.list.visible_len(),
            snapshot.len()
        );

        let title_width = usize::from(area.width).saturating_sub(26).max(8);
        let items: Vec<ListItem<'_>> = self
            .list
            .visible_tasks(snapshot.tasks())
            .map(|task| ListItem::new(render_row(task, title_width)))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        if self.list.has_visible_tasks() {
            state.select(Some(self.list.selected_index()));
        }
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_input(&self, f: &mut Frame<'_>, area: Rect) {
        let (title, text) = match (&self.composer, &self.editor) {
            (Composer::Composing { draft }, _) => (
                " new task (enter: add, esc: cancel) ".to_owned(),
                format!("{draft}|"),
            ),
            (_, RowEditor::Editing { id, draft }) => (
                format!(" edit task {id} (enter: save, esc: cancel) "),
                format!("{draft}|"),
            ),
            _ => (
                " keys ".to_owned(),
                "a add | e edit | space toggle | d delete | f filter | r refresh | q quit"
                    .to_owned(),
            ),
        };
        f.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }

    fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let Some(message) = &self.message else {
            return;
        };
        let style = match message.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        };
        f.render_widget(Paragraph::new(message.text.clone()).style(style), area);
    }
}

fn render_row(task: &Task, title_width: usize) -> Line<'static> {
    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        Style::default().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
    } else {
        Style::default()
    };
    let created = task.created_at.format(CREATED_FORMAT).unwrap_or_default();

    Line::from(vec![
        Span::raw(checkbox),
        Span::styled(truncate_graphemes(&task.title, title_width), title_style),
        Span::styled(format!("  {created}"), Style::default().fg(Color::DarkGray)),
    ])
}

/// Truncate to at most `max` grapheme clusters, marking the cut.
fn truncate_graphemes(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let taken: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{taken}~")
    } else {
        taken
    }
}
