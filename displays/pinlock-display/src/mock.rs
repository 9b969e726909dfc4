//! Recording surface for tests

use pinlock_core::traits::{DisplayError, DrawMode, DrawSurface, CHAR_WIDTH};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    Rect(i32, i32, i32, i32, DrawMode),
    Line(i32, i32, i32, i32, DrawMode),
    Text(i32, i32, String),
    Update,
}

#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
    cursor: (i32, i32),
}

impl RecordingSurface {
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(_, _, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn text_at(&self, text: &str) -> Option<(i32, i32)> {
        self.ops.iter().find_map(|op| match op {
            Op::Text(x, y, t) if t == text => Some((*x, *y)),
            _ => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ops.clear();
        self.ops.push(Op::Clear);
        Ok(())
    }

    fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mode: DrawMode) -> Result<(), DisplayError> {
        self.ops.push(Op::Rect(x0, y0, x1, y1, mode));
        Ok(())
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, mode: DrawMode) -> Result<(), DisplayError> {
        self.ops.push(Op::Line(x0, y0, x1, y1, mode));
        Ok(())
    }

    fn set_cursor(&mut self, x: i32, y: i32) -> Result<(), DisplayError> {
        self.cursor = (x, y);
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ops.push(Op::Text(self.cursor.0, self.cursor.1, text.into()));
        self.cursor.0 += text.len() as i32 * CHAR_WIDTH;
        Ok(())
    }

    fn update(&mut self) -> Result<(), DisplayError> {
        self.ops.push(Op::Update);
        Ok(())
    }
}
