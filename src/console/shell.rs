//! The dispatcher and every command handler.
//!
//! [`Shell`] is the one explicit context value of the firmware: it owns
//! the collaborator ports and the power controller, and every handler
//! runs against it. Handlers write their success output to the transcript
//! and return a typed outcome; [`Shell::run_line`] renders every error
//! through the single formatter in [`ConsoleError`]'s `Display`.
//!
//! ```text
//!  line ──▶ tokenize ──▶ lookup ──▶ arity check ──▶ handler ──▶ ports
//!                │            │            │            │
//!                └── empty    └── unknown  └── usage    └── typed error
//!                    no-op        command      report       ──▶ formatter
//! ```

use core::fmt::Write;

use log::info;

use crate::power::{PowerMode, PowerModeController, PowerPort};

use super::commands::{lookup, CommandKind, CommandSpec};
use super::error::ConsoleError;
use super::hexdump;
use super::line::MAX_LINE_LENGTH;
use super::parser::{tokenize, TokenList};
use super::ports::{units, ClockPort, ParamStore, RadioPort, StoreError, TempSensorPort, UnitId};

/// Largest unit the read handlers can display.
const UNIT_BUF: usize = 256;

/// What the foreground loop should do after a dispatched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep polling.
    Continue,
    /// The operator requested the terminal halt state; do not poll again.
    Halt,
}

/// Console context: collaborator ports plus the power controller,
/// threaded to every handler.
pub struct Shell<S, R, T, C, P>
where
    S: ParamStore,
    R: RadioPort,
    T: TempSensorPort,
    C: ClockPort,
    P: PowerPort,
{
    store: S,
    radio: R,
    temp: T,
    clock: C,
    power: PowerModeController<P>,
}

impl<S, R, T, C, P> Shell<S, R, T, C, P>
where
    S: ParamStore,
    R: RadioPort,
    T: TempSensorPort,
    C: ClockPort,
    P: PowerPort,
{
    pub fn new(store: S, radio: R, temp: T, clock: C, power: PowerModeController<P>) -> Self {
        Self {
            store,
            radio,
            temp,
            clock,
            power,
        }
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Tokenize and dispatch one completed line.
    ///
    /// Every failure is rendered to the transcript here; the caller only
    /// learns whether to keep polling.
    pub fn run_line(&mut self, line: &str, out: &mut dyn Write) -> Flow {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Flow::Continue;
        }
        match self.dispatch(&tokens, out) {
            Ok(flow) => flow,
            Err(err) => {
                let _ = writeln!(out, "{}", err);
                Flow::Continue
            }
        }
    }

    fn dispatch<'a>(
        &mut self,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        let name = tokens[0];
        let spec = lookup(name).ok_or(ConsoleError::UnknownCommand(name))?;
        if !spec.arity_ok(tokens.len() - 1) {
            return Err(ConsoleError::BadArity(spec));
        }
        match spec.kind {
            CommandKind::Help => self.cmd_help(out),
            CommandKind::Halt => self.cmd_halt(tokens, out),
            CommandKind::PastFormat => self.cmd_past_format(out),
            CommandKind::PastRead => self.cmd_past_read(tokens, out),
            CommandKind::PastWrite => self.cmd_past_write(tokens, out),
            CommandKind::PastErase => self.cmd_past_erase(tokens, out),
            CommandKind::PastDump => self.cmd_past_dump(tokens, out),
            CommandKind::Temp => self.cmd_temp(out),
            CommandKind::TempAlert => self.cmd_temp_alert(spec, tokens, out),
            CommandKind::Rfm => self.cmd_rfm(spec, tokens, out),
            CommandKind::Rtc => self.cmd_rtc(out),
            CommandKind::Power => self.cmd_power(tokens, out),
        }
    }

    /// Forwarded to the power controller; see
    /// [`PowerModeController::idle_poll`].
    pub fn idle_poll(&mut self, out: &mut dyn Write) {
        self.power.idle_poll(out);
    }

    pub fn power_mode(&self) -> PowerMode {
        self.power.mode()
    }

    pub fn power(&self) -> &PowerModeController<P> {
        &self.power
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn temp(&self) -> &T {
        &self.temp
    }

    // ── Handlers ──────────────────────────────────────────────

    fn cmd_help<'a>(&mut self, out: &mut dyn Write) -> Result<Flow, ConsoleError<'a>> {
        for spec in super::commands::COMMANDS {
            let _ = writeln!(out, "{}    {}", spec.name, spec.help);
        }
        Ok(Flow::Continue)
    }

    fn cmd_halt<'a>(
        &mut self,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        for (i, tok) in tokens.iter().enumerate() {
            let _ = writeln!(out, "{} '{}'", i, tok);
        }
        let _ = writeln!(out, "Halted");
        info!("operator requested halt");
        Ok(Flow::Halt)
    }

    fn cmd_past_format<'a>(&mut self, out: &mut dyn Write) -> Result<Flow, ConsoleError<'a>> {
        self.store.format()?;
        self.store.init()?;
        info!("parameter storage reformatted");
        let _ = writeln!(out, "OK");
        Ok(Flow::Continue)
    }

    fn cmd_past_read<'a>(
        &mut self,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        let id: UnitId = parse_num(tokens[1])?;
        let mut buf = [0u8; UNIT_BUF];
        let len = match self.store.read_unit(id, &mut buf) {
            Ok(len) => len,
            Err(StoreError::NotFound) => return Err(ConsoleError::UnitNotFound(id)),
            Err(e) => return Err(e.into()),
        };
        // Units written by pastwrite carry a NUL terminator; strip it for
        // the text preview but dump the full record.
        let shown = buf[..len].strip_suffix(&[0]).unwrap_or(&buf[..len]);
        let text = core::str::from_utf8(shown).unwrap_or("(binary)");
        let _ = writeln!(out, "'{}' ({} bytes)", text, len);
        hexdump::dump(out, 0, &buf[..len]);
        Ok(Flow::Continue)
    }

    fn cmd_past_write<'a>(
        &mut self,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        let id: UnitId = parse_num(tokens[1])?;
        let data = tokens[2].as_bytes();
        // Stored as a NUL-terminated string, like every text unit.
        let mut buf = [0u8; MAX_LINE_LENGTH];
        let n = data.len().min(MAX_LINE_LENGTH - 1);
        buf[..n].copy_from_slice(&data[..n]);
        self.store.write_unit(id, &buf[..=n])?;
        let _ = writeln!(out, "Wrote unit {} ({} bytes)", id, n + 1);
        Ok(Flow::Continue)
    }

    fn cmd_past_erase<'a>(
        &mut self,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        let id: UnitId = parse_num(tokens[1])?;
        self.store.erase_unit(id)?;
        let _ = writeln!(out, "Erased unit {}", id);
        Ok(Flow::Continue)
    }

    fn cmd_past_dump<'a>(
        &mut self,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        let request = match tokens.get(1) {
            Some(tok) => parse_num::<usize>(tok)?,
            None => usize::MAX,
        };
        let blocks = self.store.raw_blocks();
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                let _ = writeln!(out);
            }
            let _ = writeln!(out, "Past block {}:", i);
            let n = request.min(block.bytes.len());
            hexdump::dump(out, block.origin, &block.bytes[..n]);
        }
        Ok(Flow::Continue)
    }

    fn cmd_temp<'a>(&mut self, out: &mut dyn Write) -> Result<Flow, ConsoleError<'a>> {
        let mc = self.temp.read_millicelsius()?;
        let _ = writeln!(out, "{}.{}°C", mc / 1000, (mc % 1000).abs() / 100);
        Ok(Flow::Continue)
    }

    fn cmd_temp_alert<'a>(
        &mut self,
        spec: &'static CommandSpec,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        match tokens.len() {
            1 => {
                let _ = writeln!(out, "{}", u8::from(self.temp.alert_pin_level()));
                Ok(Flow::Continue)
            }
            3 => {
                let low: i16 = parse_num(tokens[1])?;
                let high: i16 = parse_num(tokens[2])?;
                if low > high {
                    return Err(ConsoleError::Illegal("low must not exceed high"));
                }
                self.temp.set_alert_limits(low, high)?;
                let _ = writeln!(out, "low:{} high:{}", low, high);
                Ok(Flow::Continue)
            }
            _ => Err(ConsoleError::BadArity(spec)),
        }
    }

    fn cmd_rfm<'a>(
        &mut self,
        spec: &'static CommandSpec,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        match tokens.len() {
            1 => self.rfm_settings(out),
            2 => match tokens[1] {
                "init" => self.rfm_init(out),
                _ => Err(ConsoleError::Illegal("illegal command")),
            },
            3 => {
                let value = tokens[2];
                match tokens[1] {
                    "id" => self.rfm_set_u32(units::RADIO_NODE_ID, parse_num(value)?, out),
                    "net" => self.rfm_set_u32(units::RADIO_NETWORK_ID, parse_num(value)?, out),
                    "gw" => self.rfm_set_u32(units::RADIO_GATEWAY_ID, parse_num(value)?, out),
                    "pwr" => self.rfm_set_u32(units::RADIO_MAX_POWER, parse_num(value)?, out),
                    "key" => {
                        if value.len() != 16 {
                            return Err(ConsoleError::KeyLength);
                        }
                        self.store.write_unit(units::RADIO_AES_KEY, value.as_bytes())?;
                        let _ = writeln!(out, "OK");
                        Ok(Flow::Continue)
                    }
                    _ => Err(ConsoleError::Illegal("illegal command")),
                }
            }
            4 => match tokens[1] {
                "tx" => {
                    let dest: u8 = parse_num(tokens[2])?;
                    let delivery = self.radio.send_frame(dest, tokens[3].as_bytes())?;
                    let _ = writeln!(out, "OK:{}:{}", delivery.status, delivery.rssi);
                    Ok(Flow::Continue)
                }
                _ => Err(ConsoleError::Illegal("illegal command")),
            },
            _ => Err(ConsoleError::BadArity(spec)),
        }
    }

    fn cmd_rtc<'a>(&mut self, out: &mut dyn Write) -> Result<Flow, ConsoleError<'a>> {
        let tod = self.clock.time_of_day();
        let _ = writeln!(
            out,
            "Time: {:02}:{:02}:{:02}",
            tod.hours, tod.minutes, tod.seconds
        );
        let _ = writeln!(out, "RTC counter: {}", self.clock.wakeup_count());
        Ok(Flow::Continue)
    }

    fn cmd_power<'a>(
        &mut self,
        tokens: &TokenList<'a>,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        match tokens[1] {
            "low" => {
                self.power.enter_low_power();
                let _ = writeln!(out, "OK");
                Ok(Flow::Continue)
            }
            "normal" => {
                self.power.enter_active();
                let _ = writeln!(out, "OK");
                Ok(Flow::Continue)
            }
            _ => Err(ConsoleError::Illegal("illegal argument")),
        }
    }

    // ── rfm helpers ───────────────────────────────────────────

    fn rfm_settings<'a>(&mut self, out: &mut dyn Write) -> Result<Flow, ConsoleError<'a>> {
        let labels = [
            ("Node id    ", units::RADIO_NODE_ID),
            ("Network id ", units::RADIO_NETWORK_ID),
            ("Gateway id ", units::RADIO_GATEWAY_ID),
            ("Max power  ", units::RADIO_MAX_POWER),
        ];
        for (label, id) in labels {
            match self.read_u32_unit(id) {
                Some(v) => {
                    let _ = writeln!(out, "{}: {}", label, v);
                }
                None => {
                    let _ = writeln!(out, "{}: NA", label);
                }
            }
        }
        let mut key = [0u8; UNIT_BUF];
        match self.store.read_unit(units::RADIO_AES_KEY, &mut key) {
            Ok(len) => {
                let shown = core::str::from_utf8(&key[..len]).unwrap_or("(binary)");
                let _ = writeln!(out, "AES key    : {}", shown);
            }
            Err(_) => {
                let _ = writeln!(out, "AES key    : NA");
            }
        }
        Ok(Flow::Continue)
    }

    fn rfm_init<'a>(&mut self, out: &mut dyn Write) -> Result<Flow, ConsoleError<'a>> {
        let node = self
            .read_u32_unit(units::RADIO_NODE_ID)
            .ok_or(ConsoleError::MissingSetting("RFM node id"))?;
        let network = self
            .read_u32_unit(units::RADIO_NETWORK_ID)
            .ok_or(ConsoleError::MissingSetting("RFM network id"))?;
        // The gateway id never reaches the transceiver, but a node
        // without one is useless in the field, so demand it up front.
        self.read_u32_unit(units::RADIO_GATEWAY_ID)
            .ok_or(ConsoleError::MissingSetting("RFM gateway id"))?;
        let max_power = self
            .read_u32_unit(units::RADIO_MAX_POWER)
            .ok_or(ConsoleError::MissingSetting("RFM max power"))?;

        let mut key = [0u8; 16];
        match self.store.read_unit(units::RADIO_AES_KEY, &mut key) {
            Ok(16) => {}
            Ok(_) => return Err(ConsoleError::KeyLength),
            Err(_) => return Err(ConsoleError::MissingSetting("RFM AES key")),
        }

        self.radio.reset();
        self.radio.init()?;
        // Configure, then leave the transceiver asleep until first use.
        self.radio.sleep();
        self.radio.set_power_dbm(max_power as u8);
        self.radio.set_csma(true);
        self.radio.set_auto_rssi(true);
        self.radio.set_aes_key(&key);
        self.radio.set_node_id(node as u8);
        self.radio.set_network_id(network as u8);
        info!("radio configured: node {} network {}", node, network);
        let _ = writeln!(out, "OK");
        Ok(Flow::Continue)
    }

    fn rfm_set_u32<'a>(
        &mut self,
        id: UnitId,
        value: u32,
        out: &mut dyn Write,
    ) -> Result<Flow, ConsoleError<'a>> {
        let _ = writeln!(out, "{}:{}", id, value);
        self.store.write_unit(id, &value.to_le_bytes())?;
        let _ = writeln!(out, "OK");
        Ok(Flow::Continue)
    }

    fn read_u32_unit(&self, id: UnitId) -> Option<u32> {
        let mut buf = [0u8; 8];
        match self.store.read_unit(id, &mut buf) {
            Ok(len) if len >= 4 => Some(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
            _ => None,
        }
    }
}

/// Parse a numeric token, reporting the offending token on failure.
fn parse_num<'a, N: core::str::FromStr>(tok: &'a str) -> Result<N, ConsoleError<'a>> {
    tok.parse().map_err(|_| ConsoleError::BadNumber(tok))
}
