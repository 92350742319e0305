//! Console reporter with colored output

use crate::describe::Description;
use crate::view::{NodeView, View};
use colored::{ColoredString, Colorize};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to print the shown description panel
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Print the selected description panel below the tree
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn report(&self, view: &View) {
        print!("{}", self.render(view));
    }

    /// Summary line only
    pub fn report_quiet(&self, view: &View) {
        println!("{}", self.summary_line(view));
    }

    pub fn render(&self, view: &View) -> String {
        let mut out = String::new();
        self.render_node(&mut out, view, view.root(), 0);
        if self.verbose {
            if let Some(d) = view.visible_panel() {
                out.push('\n');
                self.render_description(&mut out, d);
            }
        }
        out.push('\n');
        out.push_str(&self.summary_line(view));
        out.push('\n');
        out
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn render_node(&self, out: &mut String, view: &View, node: &NodeView, depth: usize) {
        if node.hidden_by_filter {
            return;
        }
        let indent = "  ".repeat(depth);

        if node.is_folder {
            let caret = if node.expanded { "▾" } else { "▸" };
            out.push_str(&format!(
                "{}{} {}\n",
                indent,
                self.paint(caret, |s| s.dimmed()),
                self.paint(&node.name, |s| s.bold())
            ));
            if node.expanded {
                for child in view.children(node) {
                    self.render_node(out, view, child, depth + 1);
                }
            }
            return;
        }

        let name = if node.highlighted {
            self.paint(&format!("> {}", node.name), |s| s.black().on_green())
        } else {
            format!("  {}", node.name)
        };
        let mut tags = String::new();
        if node.tags.has_warning {
            tags.push(' ');
            tags.push_str(&self.paint("[W]", |s| s.yellow()));
        }
        if node.tags.has_error {
            tags.push(' ');
            tags.push_str(&self.paint("[E]", |s| s.red().bold()));
        }
        out.push_str(&format!("{}{}{}\n", indent, name, tags));
    }

    fn render_description(&self, out: &mut String, d: &Description) {
        out.push_str(&format!("{}\n", self.paint(&d.id, |s| s.bold().underline())));
        if !d.description.trim().is_empty() {
            out.push_str(&format!("   {}\n", d.description));
        }
        if let Some(err) = &d.error {
            out.push_str(&format!("   {}: {}\n", self.paint("Error", |s| s.red().bold()), err));
        }
        for w in d.warnings() {
            out.push_str(&format!("   {}: {}\n", self.paint("Warning", |s| s.yellow()), w));
        }
        for (heading, params) in [("In", &d.inputs), ("Out", &d.outputs), ("Test", &d.test_params)] {
            for p in params {
                out.push_str(&format!(
                    "   {} {} {}\n",
                    self.paint(heading, |s| s.dimmed()),
                    p.name,
                    p.description
                ));
            }
        }
        if let Some(t) = &d.load_time {
            out.push_str(&format!("   {} {}\n", self.paint("Loaded", |s| s.dimmed()), t));
        }
        out.push_str(&format!("   {} {}\n", self.paint("Timeout", |s| s.dimmed()), d.timeout));
        out.push_str(&format!("   {} {}\n", self.paint("Test pass", |s| s.dimmed()), d.test_pass));
    }

    fn summary_line(&self, view: &View) -> String {
        let s = &view.summary;
        let mut line = format!(
            "{} items, {} warnings, {} errors",
            s.items,
            self.paint(&s.warnings.to_string(), |t| t.yellow()),
            self.paint(&s.errors.to_string(), |t| t.red())
        );
        if view.filter_active {
            line.push_str(&format!(" ({} shown)", s.visible_items));
        }
        line
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
