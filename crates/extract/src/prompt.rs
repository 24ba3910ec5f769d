/// Instruction sent alongside every image.
pub const OCR_INSTRUCTION: &str = "Analyze the text in the provided image. Extract all readable content \
and present it in a structured Markdown format that is clear, concise, and well-organized. \
Ensure proper formatting (e.g., headings, lists, or code blocks) as necessary to represent \
the content effectively.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_asks_for_markdown() {
        assert!(OCR_INSTRUCTION.contains("Markdown"));
        assert!(OCR_INSTRUCTION.contains("headings, lists, or code blocks"));
        assert!(!OCR_INSTRUCTION.contains("  "));
    }
}
