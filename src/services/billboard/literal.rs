//! 宽松 JS 对象字面量解析
//!
//! 接口返回的是 `var x={data:[...]}` 形式的脚本，键名没有引号，
//! 不是严格 JSON。这里用递归下降解析为 `serde_json::Value`，不执行任何代码。
//!
//! 支持：无引号键名、单/双引号字符串、数字、true/false/null、数组、对象、
//! 尾随逗号。作为值出现的裸标识符解析为同名字符串。

use serde_json::{Map, Number, Value};

use super::error::{BillboardError, Result};

const MAX_DEPTH: usize = 128;

/// 解析完整字面量，允许末尾的分号和空白
pub fn parse_literal(input: &str) -> Result<Value> {
    let mut parser = Parser {
        src: input.as_bytes(),
        text: input,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    while parser.peek() == Some(b';') {
        parser.pos += 1;
        parser.skip_ws();
    }
    if parser.pos != parser.src.len() {
        return Err(parser.error("字面量之后存在多余内容"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a [u8],
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, msg: &str) -> BillboardError {
        BillboardError::decode(format!("{} (位置 {})", msg, self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("期望 '{}'", b as char)))
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek() {
            Some(b'{') => self.nested(Self::object),
            Some(b'[') => self.nested(Self::array),
            Some(q @ (b'"' | b'\'')) => self.string(q).map(Value::String),
            Some(b) if b == b'-' || b == b'+' || b == b'.' || b.is_ascii_digit() => self.number(),
            Some(b) if is_ident_start(b) => {
                let word = self.ident();
                Ok(match word {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" | "undefined" => Value::Null,
                    other => Value::String(other.to_string()),
                })
            }
            Some(_) => Err(self.error("无法识别的字符")),
            None => Err(self.error("字面量意外结束")),
        }
    }

    fn nested(&mut self, f: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error("嵌套层级过深"));
        }
        let v = f(self);
        self.depth -= 1;
        v
    }

    fn object(&mut self) -> Result<Value> {
        self.expect(b'{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                Some(q @ (b'"' | b'\'')) => {
                    let key = self.string(q)?;
                    self.member(&mut map, key)?;
                }
                Some(b) if is_ident_start(b) || b.is_ascii_digit() => {
                    let key = self.ident().to_string();
                    self.member(&mut map, key)?;
                }
                _ => return Err(self.error("期望对象键名")),
            }
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {}
                _ => return Err(self.error("期望 ',' 或 '}'")),
            }
        }
    }

    fn member(&mut self, map: &mut Map<String, Value>, key: String) -> Result<()> {
        self.expect(b':')?;
        let value = self.value()?;
        map.insert(key, value);
        Ok(())
    }

    fn array(&mut self) -> Result<Value> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b']') {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {}
                _ => return Err(self.error("期望 ',' 或 ']'")),
            }
        }
    }

    fn ident(&mut self) -> &'a str {
        let text = self.text;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_ident_start(b) || b.is_ascii_digit() {
                self.pos += 1;
            } else {
                break;
            }
        }
        &text[start..self.pos]
    }

    fn string(&mut self, quote: u8) -> Result<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let start = self.pos;
            while let Some(b) = self.peek() {
                if b == quote || b == b'\\' {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&self.text[start..self.pos]);
            match self.peek() {
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.escape(&mut out)?;
                }
                _ => return Err(self.error("字符串未闭合")),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<()> {
        let b = self.peek().ok_or_else(|| self.error("转义序列不完整"))?;
        self.pos += 1;
        match b {
            b'n' => out.push('\n'),
            b't' => out.push('\t'),
            b'r' => out.push('\r'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'0' => out.push('\0'),
            b'u' => {
                let code = self.hex4()?;
                let ch = match code {
                    0xD800..=0xDBFF => self.low_surrogate(code),
                    _ => char::from_u32(code),
                };
                out.push(ch.unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            _ => {
                // 其余转义按原字符处理（\" \' \\ \/ 等）
                self.pos -= 1;
                let ch = self.text[self.pos..]
                    .chars()
                    .next()
                    .ok_or_else(|| self.error("转义序列不完整"))?;
                self.pos += ch.len_utf8();
                out.push(ch);
            }
        }
        Ok(())
    }

    fn hex4(&mut self) -> Result<u32> {
        let hex = self
            .text
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("\\u 转义不完整"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("\\u 转义无效"))?;
        self.pos += 4;
        Ok(code)
    }

    /// 高位代理后紧跟 `\uDC00`~`\uDFFF` 时合成一个字符，否则不消耗后续内容
    fn low_surrogate(&mut self, high: u32) -> Option<char> {
        if !self.text[self.pos..].starts_with("\\u") {
            return None;
        }
        let saved = self.pos;
        self.pos += 2;
        match self.hex4() {
            Ok(low @ 0xDC00..=0xDFFF) => {
                char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
            }
            _ => {
                self.pos = saved;
                None
            }
        }
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let raw = self.text[start..self.pos].trim_start_matches('+');
        if let Ok(i) = raw.parse::<i64>() {
            return Ok(Value::Number(Number::from(i)));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(&format!("无效数字 {}", raw)))
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}
