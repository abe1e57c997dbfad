use std::borrow::Cow;

use crate::frontend::scanner::Event;

/// Number of cells in the generated program's tape.
pub const TAPE_LENGTH: usize = 1000;

const HEADER: &str =
    concat!("// Generated by bfcc ", env!("CARGO_PKG_VERSION"));

/// Renders one event as C++ source text. Runs of zero render as nothing.
pub fn render(event: Event) -> Cow<'static, str> {
    use Event as E;
    match event {
        E::Prologue => format!(
            "{HEADER}\n\
             #include <iostream>\n\
             unsigned char m[{TAPE_LENGTH}];\n\
             int p = 0;\n\
             char inp = ' ';\n\
             int main() {{\n"
        )
        .into(),
        E::FlushData(0) | E::FlushPtr(0) => "".into(),
        E::FlushData(delta) => run("m[p]", delta).into(),
        E::FlushPtr(delta) => run("p", delta).into(),
        E::LoopOpen => "    while (m[p]) {\n".into(),
        E::LoopClose => "    }\n".into(),
        E::Output => concat!(
            "    if (m[p] == 10) { std::cout << '\\n' << std::flush; }",
            " else { std::cout << (char)m[p]; }\n"
        )
        .into(),
        E::Input => {
            "    std::cin.get(inp); m[p] = (unsigned char)inp;\n".into()
        }
        E::Epilogue => "    return 0;\n}\n".into(),
    }
}

// sign goes into the operator, the literal is always positive
fn run(target: &str, delta: i64) -> String {
    let op = if delta > 0 { '+' } else { '-' };
    format!("    {target} {op}= {};\n", delta.unsigned_abs())
}

/// Appends rendered events in the order they arrive.
#[derive(Debug, Default)]
pub struct Emitter {
    text: String,
    statements: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        let rendered = render(event);
        if !rendered.is_empty()
            && !matches!(event, Event::Prologue | Event::Epilogue)
        {
            self.statements += 1;
        }
        self.text.push_str(&rendered);
    }

    /// Statements emitted so far, excluding prologue and epilogue.
    pub fn statements(&self) -> usize {
        self.statements
    }

    pub fn finish(self) -> String {
        self.text
    }
}

impl Extend<Event> for Emitter {
    fn extend<T: IntoIterator<Item = Event>>(&mut self, events: T) {
        events.into_iter().for_each(|event| self.emit(event));
    }
}
