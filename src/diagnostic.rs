use std::fmt;

/// A range of bytes in the surface source a program's tree was parsed
/// from. Spans travel with every node; the source itself is usually not
/// available, in which case diagnostics render bare (see [`render_bare`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Style for diagnostic labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Primary,
    Secondary,
}

/// A label pointing at a span
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

/// A complete diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Computes 1-based line and column from a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Renders diagnostics in a Rust-like layout against the surface source
/// the spans point into.
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    /// Render a diagnostic to a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        self.render_header(&mut output, diagnostic);

        if let Some(label) = diagnostic.labels.first() {
            let (line, col) = line_col(self.source, label.span.start);
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.style_blue("-->"),
                self.file_name,
                line,
                col
            ));
        }

        let width = diagnostic
            .labels
            .iter()
            .map(|label| line_col(self.source, label.span.start).0.to_string().len())
            .max()
            .unwrap_or(1);

        if !diagnostic.labels.is_empty() {
            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
            for label in &diagnostic.labels {
                self.render_label(&mut output, label, width);
            }
            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style_blue("="), note));
        }

        output
    }

    fn render_header(&self, output: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Error => self.style_red_bold("error"),
            Severity::Warning => self.style_yellow_bold("warning"),
        };

        if let Some(code) = &diagnostic.code {
            output.push_str(&format!(
                "{}[{}]: {}\n",
                severity,
                code,
                self.style_bold(&diagnostic.message)
            ));
        } else {
            output.push_str(&format!("{}: {}\n", severity, self.style_bold(&diagnostic.message)));
        }
    }

    fn render_label(&self, output: &mut String, label: &Label, width: usize) {
        let (line_num, col) = line_col(self.source, label.span.start);
        let content = match self.source.lines().nth(line_num - 1) {
            Some(line) => line,
            None => return,
        };

        output.push_str(&format!(
            "{:>width$} {} {}\n",
            self.style_blue(&line_num.to_string()),
            self.style_blue("|"),
            content,
            width = width + 1
        ));

        // Underline the labeled columns, clamped to the line.
        let len = (label.span.end.saturating_sub(label.span.start)).max(1);
        let len = len.min(content.len().saturating_sub(col - 1).max(1));
        let marker = match label.style {
            LabelStyle::Primary => "^",
            LabelStyle::Secondary => "-",
        }
        .repeat(len);
        let marker = match label.style {
            LabelStyle::Primary => self.style_red(&marker),
            LabelStyle::Secondary => self.style_blue(&marker),
        };

        let mut underline = format!(
            "{} {} {}{}",
            " ".repeat(width + 1),
            self.style_blue("|"),
            " ".repeat(col - 1),
            marker
        );
        if !label.message.is_empty() {
            let styled = match label.style {
                LabelStyle::Primary => self.style_red(&label.message),
                LabelStyle::Secondary => self.style_blue(&label.message),
            };
            underline.push(' ');
            underline.push_str(&styled);
        }
        underline.push('\n');
        output.push_str(&underline);
    }

    // Color helpers
    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_red_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_yellow_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;33m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_blue(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[34m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}

/// Fallback layout when the surface source is not available: the header,
/// the byte range of each label, and the notes.
pub fn render_bare(diagnostic: &Diagnostic, file_name: &str, use_color: bool) -> String {
    let renderer = DiagnosticRenderer::new("", file_name, use_color);
    let mut output = String::new();
    renderer.render_header(&mut output, diagnostic);

    for label in &diagnostic.labels {
        if label.span.is_dummy() && label.message.is_empty() {
            continue;
        }
        let location = if label.span.is_dummy() {
            String::new()
        } else {
            format!(
                " at {}:{}..{}",
                file_name, label.span.start, label.span.end
            )
        };
        output.push_str(&format!(
            "  {} {}{}\n",
            renderer.style_blue("-->"),
            label.message,
            location
        ));
    }

    for note in &diagnostic.notes {
        output.push_str(&format!("  {} {}\n", renderer.style_blue("="), note));
    }

    output
}

/// Render multiple diagnostics, with snippets when `source` is available.
pub fn render_diagnostics(
    source: Option<&str>,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let mut output = String::new();

    for diagnostic in diagnostics {
        match source {
            Some(source) => {
                let renderer = DiagnosticRenderer::new(source, file_name, use_color);
                output.push_str(&renderer.render(diagnostic));
            }
            None => output.push_str(&render_bare(diagnostic, file_name, use_color)),
        }
        output.push('\n');
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }

    output
}
