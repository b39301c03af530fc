//! Display batching for streamed answers

/// Rewrite `\(..\)` to `$..$` and `\[..\]` to `$$..$$`
pub fn rewrite_latex(text: &str) -> String {
    text.replace(r"\(", "$")
        .replace(r"\)", "$")
        .replace(r"\[", "$$")
        .replace(r"\]", "$$")
}

/// Accumulates streamed chunks and releases them a sentence at a time.
///
/// A segment is released as soon as the buffer holds a period; it runs
/// through the last period seen and the tail stays buffered. Released
/// segments have their LaTeX delimiters rewritten.
#[derive(Debug, Default)]
pub struct SentenceBuffer {
    pending: String,
}

impl SentenceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk, returning a display update when a sentence completes
    pub fn push(&mut self, chunk: &str) -> Option<String> {
        self.pending.push_str(chunk);
        let end = self.pending.rfind('.')? + 1;
        let rest = self.pending.split_off(end);
        let segment = std::mem::replace(&mut self.pending, rest);
        Some(rewrite_latex(&segment))
    }

    /// Release whatever is left once the stream ends
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        Some(rewrite_latex(&std::mem::take(&mut self.pending)))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_updates_at_period_boundaries() {
        let mut buffer = SentenceBuffer::new();
        let updates: Vec<String> = ["Step", "1", ".", " done", ".", " end"]
            .iter()
            .filter_map(|chunk| buffer.push(chunk))
            .collect();

        assert_eq!(updates, vec!["Step1.", " done."]);
        assert!(updates.iter().all(|u| u.ends_with('.')));
        assert_eq!(buffer.finish().as_deref(), Some(" end"));
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn test_flush_keeps_tail_after_last_period() {
        let mut buffer = SentenceBuffer::new();
        assert_eq!(buffer.push("x = 2. Then y").as_deref(), Some("x = 2."));
        assert_eq!(buffer.push(" = 3. So z").as_deref(), Some(" Then y = 3."));
        assert_eq!(buffer.finish().as_deref(), Some(" So z"));
    }

    #[test]
    fn test_latex_rewritten_in_each_segment() {
        let mut buffer = SentenceBuffer::new();
        assert!(buffer.push(r"Let \(x").is_none());
        assert_eq!(buffer.push(r"=2\).").as_deref(), Some("Let $x=2$."));
        assert_eq!(
            buffer.push(r" \[x^2\].").as_deref(),
            Some(" $$x^2$$.")
        );
    }

    #[test]
    fn test_rewrite_latex() {
        assert_eq!(rewrite_latex(r"\(a\) and \[b\]"), "$a$ and $$b$$");
        assert_eq!(rewrite_latex("plain"), "plain");
    }

    #[test]
    fn test_empty_buffer_finishes_with_nothing() {
        let mut buffer = SentenceBuffer::new();
        assert!(buffer.is_empty());
        assert!(buffer.finish().is_none());
    }
}
