//! Parsers for `/proc`, `/sys` and `/etc` files.
//!
//! These are pure functions that turn file content into structured data.
//! Key/value files are consumed as `(key, value)` pairs so the same parser
//! works over [`crate::collector::reader::KvPairs`] and plain string input
//! in tests.

use crate::model::{CpuIdentity, CpuTimes, DiskIoStats, DistroIdentity, MemorySummary};

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

// ============ Field parsers ============

/// Splits a line on the first `delim`, trimming both sides.
///
/// Returns `None` for lines without the delimiter.
pub fn split_kv(line: &str, delim: char) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(delim)?;
    Some((key.trim(), value.trim()))
}

/// Strips one pair of matching double quotes.
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Returns the text between the first `[` and the following `]`.
///
/// `"none [mq-deadline] kyber"` gives `Some("mq-deadline")`.
pub fn parse_bracketed(line: &str) -> Option<&str> {
    let start = line.find('[')? + 1;
    let len = line[start..].find(']')?;
    Some(&line[start..start + len])
}

/// Parses a `"<n> kB"` value into kibibytes.
///
/// A bare number is accepted too; any other unit is rejected.
pub fn parse_kib(value: &str) -> Option<u64> {
    let mut parts = value.split_whitespace();
    let number = parts.next()?.parse().ok()?;
    match parts.next() {
        None | Some("kB") => Some(number),
        Some(_) => None,
    }
}

/// Parses a human-readable size such as `"1.5 GiB"` back into bytes.
///
/// Accepts the binary suffixes `B` through `PiB` with a 1024 step, with or
/// without a space after the number.
pub fn parse_size(value: &str) -> Option<u64> {
    const UNITS: [(&str, u32); 6] = [
        ("PiB", 5),
        ("TiB", 4),
        ("GiB", 3),
        ("MiB", 2),
        ("KiB", 1),
        ("B", 0),
    ];

    let value = value.trim();
    let (number, power) = UNITS
        .iter()
        .find_map(|(suffix, power)| Some((value.strip_suffix(suffix)?, *power)))?;
    let number: f64 = number.trim_end().parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some((number * 1024f64.powi(power as i32)).round() as u64)
}

/// Parses `cpu<digits>` directory names into the cpu number.
pub fn parse_cpu_dir(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("cpu")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses a kernel cpu list such as `0-3,6,8-9`.
pub fn parse_cpu_list(content: &str) -> Result<Vec<u32>, ParseError> {
    let mut cpus = Vec::new();
    for range in content.trim().split(',').filter(|r| !r.is_empty()) {
        let invalid = || ParseError::new(format!("invalid cpu range '{}'", range));
        match range.split_once('-') {
            Some((lo, hi)) => {
                let lo: u32 = lo.parse().map_err(|_| invalid())?;
                let hi: u32 = hi.parse().map_err(|_| invalid())?;
                if hi < lo {
                    return Err(invalid());
                }
                cpus.extend(lo..=hi);
            }
            None => cpus.push(range.parse().map_err(|_| invalid())?),
        }
    }
    Ok(cpus)
}

// ============ CPU parsers ============

/// Folds `/proc/cpuinfo` pairs into a [`CpuIdentity`].
///
/// Singleton fields keep the first non-empty value. Every `processor` key
/// counts one logical cpu; distinct `core id` values count physical cores.
pub fn parse_cpuinfo<I, K, V>(pairs: I) -> CpuIdentity
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut cpu = CpuIdentity::default();
    let mut siblings_seen = false;
    let mut base_seen = false;

    let set_once = |slot: &mut String, value: &str| {
        if slot.is_empty() && !value.is_empty() {
            *slot = value.to_string();
        }
    };

    for (key, value) in pairs {
        let value = value.as_ref();
        match key.as_ref() {
            "processor" => cpu.logical_cores += 1,
            "model name" => set_once(&mut cpu.model_name, value),
            "vendor_id" => set_once(&mut cpu.vendor, value),
            "cpu family" => set_once(&mut cpu.family, value),
            "model" => set_once(&mut cpu.model, value),
            "stepping" => set_once(&mut cpu.stepping, value),
            "microcode" => set_once(&mut cpu.microcode, value),
            "cache size" => set_once(&mut cpu.cache_size, value),
            "cpu MHz" if !base_seen && !value.is_empty() => {
                cpu.base_mhz = value.parse().unwrap_or(0.0);
                base_seen = true;
            }
            "flags" if cpu.flags.is_empty() => {
                cpu.flags = value.split_whitespace().map(str::to_string).collect();
            }
            "siblings" if !siblings_seen => {
                if let Ok(n) = value.parse() {
                    cpu.siblings = n;
                    siblings_seen = true;
                }
            }
            "core id" => *cpu.core_ids.entry(value.to_string()).or_insert(0) += 1,
            _ => {}
        }
    }

    cpu.physical_cores = if cpu.core_ids.is_empty() {
        cpu.logical_cores
    } else {
        cpu.core_ids.len() as u32
    };
    cpu
}

/// Parses the three load averages of `/proc/loadavg`.
pub fn parse_loadavg(content: &str) -> Result<(f64, f64, f64), ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError::new("not enough fields in loadavg"));
    }

    let parse = |idx: usize, name: &str| -> Result<f64, ParseError> {
        parts[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };

    Ok((parse(0, "load1")?, parse(1, "load5")?, parse(2, "load15")?))
}

/// Parses the aggregate `cpu` row of `/proc/stat`.
///
/// Missing trailing counters stay zero.
pub fn parse_cpu_stat(content: &str) -> Result<CpuTimes, ParseError> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ParseError::new("missing aggregate cpu row"))?;

    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(7)
        .map(|s| s.parse().map_err(|_| ParseError::new("invalid cpu counter")))
        .collect::<Result<_, _>>()?;
    let get = |idx: usize| values.get(idx).copied().unwrap_or(0);

    Ok(CpuTimes {
        user: get(0),
        nice: get(1),
        system: get(2),
        idle: get(3),
        iowait: get(4),
        irq: get(5),
        softirq: get(6),
    })
}

// ============ Memory parsers ============

/// Folds `/proc/meminfo` pairs into a [`MemorySummary`].
///
/// Values whose unit is not `kB` are ignored.
pub fn parse_meminfo<I, K, V>(pairs: I) -> MemorySummary
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut mem = MemorySummary::default();

    for (key, value) in pairs {
        let slot = match key.as_ref() {
            "MemTotal" => &mut mem.total_kib,
            "MemAvailable" => &mut mem.available_kib,
            "MemFree" => &mut mem.free_kib,
            "Buffers" => &mut mem.buffers_kib,
            "Cached" => &mut mem.cached_kib,
            "Shmem" => &mut mem.shared_kib,
            "SReclaimable" => &mut mem.slab_reclaimable_kib,
            "SUnreclaim" => &mut mem.slab_unreclaimable_kib,
            "SwapTotal" => &mut mem.swap_total_kib,
            "SwapFree" => &mut mem.swap_free_kib,
            "SwapCached" => &mut mem.swap_cached_kib,
            _ => continue,
        };
        if let Some(kib) = parse_kib(value.as_ref()) {
            *slot = kib;
        }
    }

    mem
}

/// Parsed data from `/proc/[pid]/status`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStatus {
    pub name: String,
    pub vm_rss_kib: u64,
}

/// Parses `Name:` and `VmRSS:` from `/proc/[pid]/status`.
///
/// Kernel threads have no `VmRSS:` line and report zero.
pub fn parse_proc_status(content: &str) -> ProcStatus {
    let mut status = ProcStatus::default();

    for (key, value) in content.lines().filter_map(|line| split_kv(line, ':')) {
        match key {
            "Name" => status.name = value.to_string(),
            "VmRSS" => status.vm_rss_kib = parse_kib(value).unwrap_or(0),
            _ => {}
        }
    }

    status
}

/// Maximum visible length of a command line.
pub const CMDLINE_MAX: usize = 40;

/// Renders a raw `/proc/[pid]/cmdline` buffer.
///
/// NUL separators become spaces, trailing whitespace is dropped, and lines
/// longer than [`CMDLINE_MAX`] characters are cut to fit with `...`.
pub fn parse_cmdline(raw: &str) -> String {
    let cmd = raw.replace('\0', " ");
    let cmd = cmd.trim_end();
    if cmd.chars().count() > CMDLINE_MAX {
        let mut cut: String = cmd.chars().take(CMDLINE_MAX - 3).collect();
        cut.push_str("...");
        cut
    } else {
        cmd.to_string()
    }
}

// ============ Disk parsers ============

/// One row of `/proc/mounts`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountEntry {
    pub device: String,
    pub mountpoint: String,
    pub fs_type: String,
    pub options: String,
}

/// Pseudo filesystems that never back a block device.
const VIRTUAL_FS: [&str; 4] = ["proc", "sysfs", "devtmpfs", "tmpfs"];

impl MountEntry {
    /// True for rows backed by a `/dev/` node on a real filesystem.
    pub fn is_block_backed(&self) -> bool {
        self.device.starts_with("/dev/") && !VIRTUAL_FS.contains(&self.fs_type.as_str())
    }
}

/// Decodes the octal escapes (`\040` for space) the kernel uses in mount paths.
pub fn unescape_octal(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\'
            && i + 3 < bytes.len()
            && let Some(code) = octal_byte(&bytes[i + 1..i + 4])
        {
            out.push(code);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn octal_byte(digits: &[u8]) -> Option<u8> {
    let mut value: u32 = 0;
    for &d in digits {
        if !(b'0'..=b'7').contains(&d) {
            return None;
        }
        value = value * 8 + u32::from(d - b'0');
    }
    u8::try_from(value).ok()
}

/// Parses `/proc/mounts`. Rows with fewer than four fields are skipped.
pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            Some(MountEntry {
                device: unescape_octal(parts.next()?),
                mountpoint: unescape_octal(parts.next()?),
                fs_type: parts.next()?.to_string(),
                options: parts.next()?.to_string(),
            })
        })
        .collect()
}

/// Parses `/proc/diskstats`.
///
/// Format: major minor name reads r_merged r_sectors r_time writes ...
pub fn parse_diskstats(content: &str) -> Result<Vec<DiskIoStats>, ParseError> {
    let mut disks = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 14 {
            continue; // Skip malformed lines
        }

        let major: u32 = parts[0]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid major '{}'", parts[0])))?;
        let minor: u32 = parts[1]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid minor '{}'", parts[1])))?;

        let get_val =
            |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

        disks.push(DiskIoStats {
            major,
            minor,
            device: parts[2].to_string(),
            reads_completed: get_val(3),
            reads_merged: get_val(4),
            sectors_read: get_val(5),
            time_reading: get_val(6),
            writes_completed: get_val(7),
            writes_merged: get_val(8),
            sectors_written: get_val(9),
            time_writing: get_val(10),
            io_in_progress: get_val(11),
            time_io: get_val(12),
            weighted_time_io: get_val(13),
        });
    }

    Ok(disks)
}

// ============ OS parsers ============

/// Folds `/etc/os-release` pairs into a [`DistroIdentity`].
///
/// Unknown keys are ignored; quoted values lose their quotes.
pub fn parse_os_release<I, K, V>(pairs: I) -> DistroIdentity
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut distro = DistroIdentity::default();

    for (key, value) in pairs {
        let slot = match key.as_ref() {
            "NAME" => &mut distro.name,
            "VERSION" => &mut distro.version,
            "ID" => &mut distro.id,
            "ID_LIKE" => &mut distro.id_like,
            "VERSION_CODENAME" => &mut distro.codename,
            "VERSION_ID" => &mut distro.version_id,
            "PRETTY_NAME" => &mut distro.pretty_name,
            "HOME_URL" => &mut distro.home_url,
            "SUPPORT_URL" => &mut distro.support_url,
            "BUG_REPORT_URL" => &mut distro.bug_report_url,
            _ => continue,
        };
        *slot = unquote(value.as_ref()).to_string();
    }

    distro
}
