//! The instruction prompt sent to the model.

use log::debug;

const INSTRUCTIONS: &str = r#"You are an expert code analysis AI.

Your task:
1. Check the given code for any syntax or logical errors.
2. If any error is found, first clearly mention:
    - The error description
    - How to fix it (give correction advice).
3. After addressing errors, provide a line-by-line explanation of the entire code.
4. Finally, generate a simple Mermaid.js flowchart following these STRICT rules:
    - Start with: graph TD;
    - Use ONLY simple letters for node IDs: A, B, C, D, E, etc.
    - Use ONLY basic arrows: A --> B
    - Keep node text EXTREMELY simple and generic:
      * Use [Start] for beginning
      * Use [Initialize vars] for variable setup
      * Use [Check condition] for any if/while conditions
      * Use [Update left pointer] or [Update right pointer] for pointer movements
      * Use [Calculate middle] for calculations
      * Use [Move left] or [Move right] for array traversals
      * Use [Increment counter] for counting operations
      * Use [Return result] for return statements
      * Use [End] for completion
    - NO variable names, NO code syntax, NO operators in node text
    - NO array indexing like nums[m] - just say "check element"
    - NO mathematical expressions - just say "calculate" or "compare"
    - Keep ALL node descriptions under 15 characters when possible

Example format:
graph TD;
A[Start] --> B[Initialize];
B --> C[Check condition];
C --> D[Update left];
C --> E[Update right];
D --> C;
E --> C;
C --> F[Return result];

Your response MUST be valid JSON format:

{
  "explanation": [
    {"line": "actual code line", "explanation": "its explanation"},
    ...
  ],
  "diagram": "graph TD; ..."
}"#;

/// Build the prompt for `source`.
///
/// # Example
///
/// ```
/// let prompt = codeflow::prompt::build("x = 1");
/// assert!(prompt.contains("Start with: graph TD;"));
/// assert!(prompt.ends_with("Code:\nx = 1"));
/// ```
pub fn build(source: &str) -> String {
    debug!(source_len = source.len(); "Building model prompt");
    format!("{INSTRUCTIONS}\n\nCode:\n{source}")
}
