//! `tracing` output routed to the browser console.

use std::io;

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Buffers one formatted event and hands it to the console on drop.
pub struct ConsoleWriter {
	level: Level,
	buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
	fn write(&mut self, data: &[u8]) -> io::Result<usize> {
		self.buf.extend_from_slice(data);
		Ok(data.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl Drop for ConsoleWriter {
	fn drop(&mut self) {
		let line = String::from_utf8_lossy(&self.buf);
		let line = line.trim_end();
		if line.is_empty() {
			return;
		}
		let line = JsValue::from_str(line);
		match self.level {
			Level::ERROR => console::error_1(&line),
			Level::WARN => console::warn_1(&line),
			Level::INFO => console::info_1(&line),
			_ => console::debug_1(&line),
		}
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
	type Writer = ConsoleWriter;

	fn make_writer(&'a self) -> Self::Writer {
		ConsoleWriter {
			level: Level::INFO,
			buf: Vec::new(),
		}
	}

	fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
		ConsoleWriter {
			level: *meta.level(),
			buf: Vec::new(),
		}
	}
}

/// Installs the console subscriber once; later calls are no-ops.
pub fn init(level: Level) {
	let _ = tracing_subscriber::fmt()
		.with_writer(ConsoleMakeWriter)
		.with_max_level(level)
		.with_ansi(false)
		.without_time()
		.with_target(true)
		.try_init();
}

pub fn parse_level(raw: Option<&str>) -> Level {
	raw.and_then(|raw| raw.trim().parse().ok()).unwrap_or(Level::INFO)
}
