use crate::stack::StackHost;

/// Visible children of `stack`, one numbered line each.
pub fn format_stack(stack: &StackHost) -> String {
    let lines = stack.visible_lines();
    if lines.is_empty() {
        return "(empty)\n".to_string();
    }
    let mut output = String::new();
    for (index, line) in lines.iter().enumerate() {
        output.push_str(&format!("{:>2}. {}\n", index + 1, line));
    }
    output
}

pub fn log_stack(title: &str, stack: &StackHost) {
    log::debug!("{title}\n{}", stack.dump());
}
