// src/infrastructure/terminal_view.rs
use std::io::Write;

use crossterm::style::Stylize;
use itertools::Itertools;
use tracing::warn;

use crate::domain::view::{RenderedSet, TagInput, TagView};

/// Line-oriented rendering of tag sets, one line per view call.
///
/// ```text
/// products: [+] a (x) | b (x)
/// tag-set-products: > new-tag-2 [add a tag] <ok> (x)
/// ```
#[derive(Debug)]
pub struct TerminalView<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint_label(&self, label: &str) -> String {
        if self.color {
            label.green().to_string()
        } else {
            label.to_string()
        }
    }

    fn paint_affordance(&self, text: &str) -> String {
        if self.color {
            text.blue().to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, line: String) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!("Failed to write view output: {}", e);
        }
    }

    fn format_input(&self, input: &TagInput) -> String {
        let tag = input
            .element_id
            .rsplit("__")
            .next()
            .unwrap_or(input.element_id.as_str());
        let mut line = format!(
            "{}: > {} [{}] {}",
            input.set_element_id,
            tag,
            input.seed,
            self.paint_affordance(&format!("<{}>", input.submit_label))
        );
        if input.deletable {
            line.push(' ');
            line.push_str(&self.paint_affordance("(x)"));
        }
        line
    }
}

impl<W: Write> TagView for TerminalView<W> {
    fn render(&mut self, set: &RenderedSet) {
        let items = set
            .items
            .iter()
            .map(|item| {
                let label = self.paint_label(&item.label);
                if item.deletable {
                    format!("{} {}", label, self.paint_affordance("(x)"))
                } else {
                    label
                }
            })
            .join(" | ");

        let line = match &set.add_label {
            Some(add) if items.is_empty() => {
                format!("{}: {}", set.set_id, self.paint_affordance(&format!("[{}]", add)))
            }
            Some(add) => format!(
                "{}: {} {}",
                set.set_id,
                self.paint_affordance(&format!("[{}]", add)),
                items
            ),
            None => format!("{}: {}", set.set_id, items),
        };
        self.emit(line.trim_end().to_string());
    }

    fn present_provisional(&mut self, input: &TagInput) {
        let line = self.format_input(input);
        self.emit(line);
    }

    fn enter_edit_mode(&mut self, input: &TagInput) {
        let line = self.format_input(input);
        self.emit(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::view::RenderedTag;

    fn rendered(editable: bool, labels: &[&str]) -> RenderedSet {
        RenderedSet {
            set_id: "p".to_string(),
            element_id: "tag-set-p".to_string(),
            add_label: editable.then(|| "+".to_string()),
            items: labels
                .iter()
                .enumerate()
                .map(|(i, l)| RenderedTag {
                    element_id: format!("tag-set-p__tag-{}", i),
                    label: l.to_string(),
                    deletable: editable,
                })
                .collect(),
        }
    }

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn given_editable_set_when_render_then_shows_affordances() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.render(&rendered(true, &["a", "b"]));
        assert_eq!(output(view), "p: [+] a (x) | b (x)\n");
    }

    #[test]
    fn given_read_only_set_when_render_then_labels_only() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.render(&rendered(false, &["a", "b"]));
        assert_eq!(output(view), "p: a | b\n");
    }

    #[test]
    fn given_empty_set_when_render_then_add_only() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.render(&rendered(true, &[]));
        assert_eq!(output(view), "p: [+]\n");
    }

    #[test]
    fn given_provisional_input_when_presented_then_shows_seed_and_delete() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.present_provisional(&TagInput {
            set_element_id: "tag-set-p".to_string(),
            element_id: "tag-set-p__new-tag-2".to_string(),
            seed: "add a tag".to_string(),
            submit_label: "ok".to_string(),
            deletable: true,
        });
        assert_eq!(output(view), "tag-set-p: > new-tag-2 [add a tag] <ok> (x)\n");
    }
}
