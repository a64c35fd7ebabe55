//! Defines part of a Lua AST, used for generating descriptor code in a
//! composable way.
//!
//! Output is compact: call arguments are separated by bare commas and strings
//! are single-quoted, to match what existing Love2D loaders expect.

use std::fmt::{self, Write};

trait FmtLua {
    fn fmt_lua(&self, output: &mut dyn Write) -> fmt::Result;
}

macro_rules! proxy_display {
    ( $target: ty ) => {
        impl fmt::Display for $target {
            fn fmt(&self, output: &mut fmt::Formatter) -> fmt::Result {
                FmtLua::fmt_lua(self, output)
            }
        }
    };
}

pub(crate) struct Block {
    pub statements: Vec<Statement>,
}

impl FmtLua for Block {
    fn fmt_lua(&self, output: &mut dyn Write) -> fmt::Result {
        for statement in &self.statements {
            statement.fmt_lua(output)?;
            writeln!(output)?;
        }

        Ok(())
    }
}

proxy_display!(Block);

pub(crate) enum Statement {
    Local { name: String, value: Expression },
    Assign { target: Expression, value: Expression },
    Return(Expression),

    /// An empty line.
    Blank,
}

impl FmtLua for Statement {
    fn fmt_lua(&self, output: &mut dyn Write) -> fmt::Result {
        match self {
            Self::Local { name, value } => {
                write!(output, "local {} = ", name)?;
                value.fmt_lua(output)
            }
            Self::Assign { target, value } => {
                target.fmt_lua(output)?;
                write!(output, " = ")?;
                value.fmt_lua(output)
            }
            Self::Return(value) => {
                write!(output, "return ")?;
                value.fmt_lua(output)
            }
            Self::Blank => Ok(()),
        }
    }
}

proxy_display!(Statement);

pub(crate) enum Expression {
    /// A variable or dotted path like `love.graphics.newQuad`.
    Name(String),
    String(String),
    Integer(u64),

    /// An empty table constructor.
    Table,
    Index {
        table: Box<Expression>,
        key: Box<Expression>,
    },
    Call {
        function: Box<Expression>,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn name<S: Into<String>>(name: S) -> Self {
        Self::Name(name.into())
    }

    pub fn index<K: Into<Expression>>(self, key: K) -> Self {
        Self::Index {
            table: Box::new(self),
            key: Box::new(key.into()),
        }
    }

    pub fn call(self, args: Vec<Expression>) -> Self {
        Self::Call {
            function: Box::new(self),
            args,
        }
    }
}

impl FmtLua for Expression {
    fn fmt_lua(&self, output: &mut dyn Write) -> fmt::Result {
        match self {
            Self::Name(name) => write!(output, "{}", name),
            Self::String(value) => fmt_string(value, output),
            Self::Integer(value) => write!(output, "{}", value),
            Self::Table => write!(output, "{{}}"),
            Self::Index { table, key } => {
                table.fmt_lua(output)?;
                write!(output, "[")?;
                key.fmt_lua(output)?;
                write!(output, "]")
            }
            Self::Call { function, args } => {
                function.fmt_lua(output)?;
                write!(output, "(")?;

                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(output, ",")?;
                    }
                    arg.fmt_lua(output)?;
                }

                write!(output, ")")
            }
        }
    }
}

proxy_display!(Expression);

impl From<&'_ str> for Expression {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<u32> for Expression {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

fn fmt_string(value: &str, output: &mut dyn Write) -> fmt::Result {
    output.write_char('\'')?;

    for c in value.chars() {
        match c {
            '\\' => output.write_str("\\\\")?,
            '\'' => output.write_str("\\'")?,
            '\n' => output.write_str("\\n")?,
            '\r' => output.write_str("\\r")?,
            '\0' => output.write_str("\\0")?,
            other => output.write_char(other)?,
        }
    }

    output.write_char('\'')
}
