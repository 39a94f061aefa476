//! Primitive readers shared by every probe.
//!
//! Apart from [`read_source`], all of them swallow I/O errors: a file that
//! cannot be read simply yields `None` or an empty sequence, and the caller
//! leaves the corresponding field at its default.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::collector::error::CollectError;
use crate::collector::parser::split_kv;
use crate::collector::traits::FileSystem;

/// Reads the root source of a probe.
///
/// Unlike the other readers this reports the failure, since a missing root
/// source makes the whole probe unavailable.
pub fn read_source<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<String, CollectError> {
    fs.read_to_string(path)
        .map_err(|e| CollectError::io(path, e))
}

/// Reads the first line of a file, without its terminator.
pub fn read_line<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Option<String> {
    let content = fs.read_to_string(path).ok()?;
    let line = content.lines().next().unwrap_or("");
    Some(line.trim_end_matches('\r').to_string())
}

/// Reads the first whitespace-delimited token of a file and parses it.
pub fn read_scalar<T: FromStr, F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Option<T> {
    let content = fs.read_to_string(path).ok()?;
    content.split_whitespace().next()?.parse().ok()
}

/// Opens a key/value file and returns a lazy iterator over its pairs.
///
/// Returns `None` when the file cannot be read at all.
pub fn read_kv<F: FileSystem + ?Sized>(fs: &F, path: &Path, delim: char) -> Option<KvPairs> {
    let content = fs.read_to_string(path).ok()?;
    Some(KvPairs::new(content, delim))
}

/// Iterator over `key<delim>value` lines of an owned buffer.
///
/// Lines without the delimiter are skipped; both sides are trimmed.
#[derive(Debug, Clone)]
pub struct KvPairs {
    content: String,
    pos: usize,
    delim: char,
}

impl KvPairs {
    pub fn new(content: String, delim: char) -> Self {
        Self {
            content,
            pos: 0,
            delim,
        }
    }
}

impl Iterator for KvPairs {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.content.len() {
            let rest = &self.content[self.pos..];
            let (line, advance) = match rest.find('\n') {
                Some(idx) => (&rest[..idx], idx + 1),
                None => (rest, rest.len()),
            };
            self.pos += advance;

            if let Some((key, value)) = split_kv(line, self.delim) {
                return Some((key.to_string(), value.to_string()));
            }
        }
        None
    }
}

/// Returns the final path component as UTF-8, if any.
pub fn entry_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Lists the children of `dir` whose name satisfies `filter`.
///
/// A missing or unreadable directory yields an empty list. Entries are
/// sorted by name so probes see a stable order.
pub fn list_dir<F, P>(fs: &F, dir: &Path, filter: P) -> Vec<PathBuf>
where
    F: FileSystem + ?Sized,
    P: Fn(&str) -> bool,
{
    let Ok(entries) = fs.read_dir(dir) else {
        return Vec::new();
    };

    let mut matching: Vec<PathBuf> = entries
        .into_iter()
        .filter(|path| entry_name(path).is_some_and(&filter))
        .collect();
    matching.sort();
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_read_line_strips_terminator() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/gov", "performance\nignored\n");

        assert_eq!(
            read_line(&fs, Path::new("/sys/gov")),
            Some("performance".to_string())
        );
        assert_eq!(read_line(&fs, Path::new("/sys/missing")), None);
    }

    #[test]
    fn test_read_source_reports_path() {
        let fs = MockFs::new();
        let err = read_source(&fs, Path::new("/proc/cpuinfo")).unwrap_err();
        assert!(err.to_string().starts_with("cannot read /proc/cpuinfo"));
    }

    #[test]
    fn test_read_line_empty_file() {
        let mut fs = MockFs::new();
        fs.add_file("/etc/timezone", "");
        assert_eq!(
            read_line(&fs, Path::new("/etc/timezone")),
            Some(String::new())
        );
    }

    #[test]
    fn test_read_scalar() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/block/sda/size", "2048\n");
        fs.add_file("/sys/bad", "abc\n");
        fs.add_file("/proc/loadavg", "0.50 0.40 0.30 1/100 42\n");

        assert_eq!(
            read_scalar::<u64, _>(&fs, Path::new("/sys/block/sda/size")),
            Some(2048)
        );
        assert_eq!(read_scalar::<u64, _>(&fs, Path::new("/sys/bad")), None);
        assert_eq!(read_scalar::<u64, _>(&fs, Path::new("/sys/none")), None);
        let load: f64 = read_scalar(&fs, Path::new("/proc/loadavg")).unwrap();
        assert!((load - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_read_kv_lazy_pairs() {
        let mut fs = MockFs::new();
        fs.add_file(
            "/proc/cpuinfo",
            "processor\t: 0\nmodel name\t: Test CPU\n\npower management:\n",
        );

        let pairs: Vec<_> = read_kv(&fs, Path::new("/proc/cpuinfo"), ':')
            .unwrap()
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("processor".to_string(), "0".to_string()),
                ("model name".to_string(), "Test CPU".to_string()),
                ("power management".to_string(), String::new()),
            ]
        );
        assert!(read_kv(&fs, Path::new("/proc/nothing"), ':').is_none());
    }

    #[test]
    fn test_read_kv_splits_on_first_delimiter() {
        let mut pairs = KvPairs::new("URL=http://x/?a=b\nNOEQUALS\n".to_string(), '=');
        assert_eq!(
            pairs.next(),
            Some(("URL".to_string(), "http://x/?a=b".to_string()))
        );
        assert_eq!(pairs.next(), None);
    }

    #[test]
    fn test_list_dir_filters_and_sorts() {
        let mut fs = MockFs::new();
        fs.add_dir("/sys/devices/system/cpu/cpu1");
        fs.add_dir("/sys/devices/system/cpu/cpu0");
        fs.add_dir("/sys/devices/system/cpu/cpufreq");
        fs.add_file("/sys/devices/system/cpu/online", "0-1\n");

        let cpus = list_dir(&fs, Path::new("/sys/devices/system/cpu"), |name| {
            name.starts_with("cpu")
        });
        let names: Vec<_> = cpus.iter().filter_map(|p| entry_name(p)).collect();
        assert_eq!(names, vec!["cpu0", "cpu1", "cpufreq"]);
    }

    #[test]
    fn test_list_dir_missing_is_empty() {
        let fs = MockFs::new();
        assert!(list_dir(&fs, Path::new("/sys/block"), |_| true).is_empty());
    }
}
