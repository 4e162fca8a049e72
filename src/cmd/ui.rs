use {
    anyhow::Result,
    console::{Alignment, pad_str, style},
    std::{
        fmt::Display,
        io::{BufRead, Write},
    },
};

/// Colour or weight applied to a piece of console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    Bold,
}

/// Human-facing output of a run, together with the confirmation gate.
///
/// Styling and interactivity are decided by the caller, so the same code path
/// renders to a terminal or into a test buffer.
pub struct Console {
    out: Box<dyn Write>,
    input: Box<dyn BufRead>,
    styled: bool,
    interactive: bool,
}

impl Console {
    pub fn new(
        out: impl Write + 'static,
        input: impl BufRead + 'static,
        styled: bool,
        interactive: bool,
    ) -> Self {
        Self {
            out: Box::new(out),
            input: Box::new(input),
            styled,
            interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn paint(&self, tone: Tone, text: impl Display) -> String {
        if !self.styled {
            return text.to_string();
        }
        let styled = style(text.to_string()).force_styling(true);
        match tone {
            Tone::Red => styled.red(),
            Tone::Green => styled.green(),
            Tone::Yellow => styled.yellow(),
            Tone::Blue => styled.blue(),
            Tone::Magenta => styled.magenta(),
            Tone::Cyan => styled.cyan(),
            Tone::Gray => styled.black().bright(),
            Tone::Bold => styled.bold(),
        }
        .to_string()
    }

    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Writes a whole line in a single tone.
    pub fn say(&mut self, tone: Tone, text: impl Display) -> Result<()> {
        let painted = self.paint(tone, text);
        self.line(painted)
    }

    pub fn blank(&mut self) -> Result<()> {
        self.line("")
    }

    /// Writes without a trailing newline, flushing so the text shows up before
    /// a blocking call.
    pub fn write(&mut self, text: impl Display) -> Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Writes `│ text │`, padded to `width` visible columns.
    pub fn boxed(&mut self, text: &str, width: usize) -> Result<()> {
        let padded = pad_str(text, width, Alignment::Left, None);
        self.line(format!("│ {padded} │"))
    }

    /// Asks a yes/no question.
    ///
    /// Non-interactive consoles approve automatically and say so. End of input
    /// counts as a "no".
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if !self.interactive {
            self.say(Tone::Gray, format!("→ {prompt} [auto-yes]"))?;
            return Ok(true);
        }

        let mark = self.paint(Tone::Yellow, "?");
        self.write(format!("{mark} {prompt} (y/N): "))?;
        let answer = self.read_answer()?.unwrap_or_default();
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Asks for a value, returning `default` on an empty answer or in
    /// non-interactive mode.
    pub fn ask(&mut self, prompt: &str, default: &str) -> Result<String> {
        if !self.interactive {
            return Ok(default.to_string());
        }

        self.write(format!("{prompt} [{default}]: "))?;
        Ok(self
            .read_answer()?
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            // Keep the transcript tidy when the input ends mid-prompt.
            self.blank()?;
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }
}


#[cfg(test)]
mod tests {
    use {super::*, super::testing::scripted};

    #[test]
    fn non_interactive_confirm_auto_approves() {
        let (mut c, out) = scripted("", false);
        assert!(c.confirm("Commit changes?").unwrap());
        assert_eq!(out.text(), "→ Commit changes? [auto-yes]\n");
    }

    #[test]
    fn interactive_confirm_reads_answers() {
        let (mut c, out) = scripted("y\nYES\nn\n\nmaybe\n", true);
        assert!(c.confirm("one?").unwrap());
        assert!(c.confirm("two?").unwrap());
        assert!(!c.confirm("three?").unwrap());
        assert!(!c.confirm("four?").unwrap());
        assert!(!c.confirm("five?").unwrap());
        assert!(out.text().starts_with("? one? (y/N): "));
    }

    #[test]
    fn end_of_input_declines() {
        let (mut c, _) = scripted("", true);
        assert!(!c.confirm("Push to origin?").unwrap());
    }

    #[test]
    fn ask_falls_back_to_default() {
        let (mut c, _) = scripted("\n0.2.0\n", true);
        assert_eq!(c.ask("Version", "0.1.0").unwrap(), "0.1.0");
        assert_eq!(c.ask("Version", "0.1.0").unwrap(), "0.2.0");
        assert_eq!(c.ask("Version", "0.1.0").unwrap(), "0.1.0");

        let (mut c, out) = scripted("0.9.9\n", false);
        assert_eq!(c.ask("Version", "0.1.0").unwrap(), "0.1.0");
        assert!(out.text().is_empty());
    }

    #[test]
    fn unstyled_paint_is_plain() {
        let (c, _) = scripted("", false);
        assert_eq!(c.paint(Tone::Red, "✗ Failed"), "✗ Failed");
    }

    #[test]
    fn styled_boxes_pad_by_visible_width() {
        let c = Console::new(Vec::new(), std::io::empty(), true, false);
        let painted = c.paint(Tone::Bold, "danny");
        assert_ne!(painted, "danny");
        assert_eq!(
            console::measure_text_width(&pad_str(&painted, 10, Alignment::Left, None)),
            10
        );
    }
}
