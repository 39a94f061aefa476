//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc`, `/sys` and `/etc` states
//! for testing the probes under various host conditions.

use super::filesystem::MockFs;

const CPUINFO_PROCESSOR: &str = "\
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 142
model name\t: Intel(R) Core(TM) i5-8250U CPU @ 1.60GHz
stepping\t: 10
microcode\t: 0xf4
cpu MHz\t\t: 1800.000
cache size\t: 6144 KB
physical id\t: 0
siblings\t: 4
cpu cores\t: 2
flags\t\t: fpu vme de pse tsc msr pae mce cx8 apic sep mtrr pge mca cmov sse sse2 ht syscall nx lm avx avx2
";

#[allow(dead_code)]
impl MockFs {
    /// Creates a typical laptop: 4 threads on 2 cores, an HDD and an NVMe
    /// disk, swap, a handful of processes and an Ubuntu userland.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        let mut cpuinfo = String::new();
        for (processor, core) in [(0, 0), (1, 1), (2, 0), (3, 1)] {
            cpuinfo.push_str(&format!("processor\t: {}\n", processor));
            cpuinfo.push_str(CPUINFO_PROCESSOR);
            cpuinfo.push_str(&format!("core id\t\t: {}\n\n", core));
        }
        fs.add_file("/proc/cpuinfo", cpuinfo);

        fs.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
",
        );
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:         1024 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4096000 kB
SwapFree:        3072000 kB
Shmem:            128000 kB
Slab:             512000 kB
SReclaimable:     256000 kB
SUnreclaim:       256000 kB
",
        );
        fs.add_file(
            "/proc/version",
            "Linux version 6.5.0-test (builder@buildhost) (gcc (Ubuntu 12.3.0-1ubuntu1~22.04) 12.3.0, GNU ld (GNU Binutils for Ubuntu) 2.38) #1 SMP PREEMPT_DYNAMIC\n",
        );

        // CPU sysfs
        fs.add_file("/sys/devices/system/cpu/online", "0-3\n");
        fs.add_dir("/sys/devices/system/cpu/cpufreq");
        fs.add_dir("/sys/devices/system/cpu/cpuidle");
        for (cpu, core) in [(0, 0), (1, 1), (2, 0), (3, 1)] {
            fs.add_cpu(cpu, 0, core, Some((1_800_000 + cpu as u64 * 100_000, 400_000, 3_400_000)));
        }

        // Block devices
        fs.add_block_device("sda", 976_773_168, true);
        fs.add_file("/sys/block/sda/device/model", "WDC WD5000AAKX  \n");
        fs.add_file("/sys/block/sda/device/vendor", "ATA     \n");
        fs.add_file("/sys/block/sda/queue/scheduler", "none [mq-deadline] kyber bfq\n");
        fs.add_file("/sys/block/sda/queue/nr_requests", "64\n");
        fs.add_file("/sys/block/sda/sda1/size", "976771072\n");
        fs.add_file("/sys/block/sda/sda1/partition", "1\n");
        fs.add_dir("/sys/block/sda/holders");

        fs.add_block_device("nvme0n1", 1_000_215_216, false);
        fs.add_file("/sys/block/nvme0n1/device/model", "Samsung SSD 970 EVO Plus 500GB\n");
        fs.add_file("/sys/block/nvme0n1/queue/scheduler", "[none] mq-deadline\n");
        fs.add_file("/sys/block/nvme0n1/queue/nr_requests", "1023\n");
        fs.add_file("/sys/block/nvme0n1/nvme0n1p1/size", "1048576\n");
        fs.add_file("/sys/block/nvme0n1/nvme0n1p2/size", "999164928\n");

        fs.add_block_device("loop0", 112_000, false);
        fs.add_block_device("ram0", 8192, false);

        fs.add_file(
            "/proc/mounts",
            "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
udev /dev devtmpfs rw,nosuid,relatime,size=8000000k 0 0
/dev/nvme0n1p2 / ext4 rw,relatime,errors=remount-ro 0 0
tmpfs /run tmpfs rw,nosuid,nodev,noexec,relatime 0 0
/dev/sda1 /home xfs rw,relatime,attr2,inode64 0 0
/dev/loop0 /snap/core/1 squashfs ro,nodev,relatime 0 0
",
        );
        fs.add_file(
            "/proc/diskstats",
            "\
   7       0 loop0 50 0 400 10 0 0 0 0 0 20 10 0 0 0 0
   8       0 sda 12345 100 987654 5000 6789 50 456789 3000 0 4000 8000 0 0 0 0
   8       1 sda1 10000 80 800000 4000 5000 40 400000 2500 0 3500 6500 0 0 0 0
 259       0 nvme0n1 50000 200 2000000 10000 30000 150 1500000 8000 5 15000 18000 0 0 0 0
",
        );

        // Processes
        fs.add_process(1, "systemd", Some(12_288), "/sbin/init\0splash\0");
        fs.add_process(2, "kthreadd", None, "");
        fs.add_process(
            812,
            "Xorg",
            Some(254_000),
            "/usr/lib/xorg/Xorg\0vt2\0-displayfd\03\0-auth\0/run/user/1000/gdm/Xauthority\0",
        );
        fs.add_process(1000, "bash", Some(5_120), "-bash\0");
        fs.add_process(4242, "firefox", Some(1_500_000), "/usr/lib/firefox/firefox\0");
        fs.add_file("/proc/self/status", "Name:\tmeminfo\nVmRSS:\t2048 kB\n");
        fs.add_file("/proc/uptime", "93784.12 300000.00\n");

        // /etc
        fs.add_file(
            "/etc/os-release",
            "\
PRETTY_NAME=\"Ubuntu 22.04.3 LTS\"
NAME=\"Ubuntu\"
VERSION_ID=\"22.04\"
VERSION=\"22.04.3 LTS (Jammy Jellyfish)\"
VERSION_CODENAME=jammy
ID=ubuntu
ID_LIKE=debian
HOME_URL=\"https://www.ubuntu.com/\"
SUPPORT_URL=\"https://help.ubuntu.com/\"
BUG_REPORT_URL=\"https://bugs.launchpad.net/ubuntu/\"
",
        );
        fs.add_file("/etc/timezone", "Europe/Berlin\n");

        fs
    }

    /// Two `processor` rows sharing `core id` 0.
    pub fn shared_core() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
model name\t: Test CPU
core id\t\t: 0

processor\t: 1
model name\t: Test CPU
core id\t\t: 0
",
        );
        fs
    }

    /// 8000 kB of RAM with 2000 kB available and no swap.
    pub fn memory_pressure() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:           8000 kB
MemFree:             500 kB
MemAvailable:       2000 kB
Buffers:             100 kB
Cached:             1400 kB
SwapTotal:             0 kB
SwapFree:              0 kB
",
        );
        fs
    }

    /// Twenty processes with distinct resident sizes, plus noise entries.
    pub fn many_processes() -> Self {
        let mut fs = Self::new();
        for i in 0..20u32 {
            let pid = 100 + i;
            let rss = u64::from((i * 7919) % 97 + 1) * 1024;
            fs.add_process(pid, &format!("worker{}", i), Some(rss), "worker\0--serve\0");
        }
        // Not emitted: zero rss, no name, not a pid directory
        fs.add_process(200, "idle", Some(0), "");
        fs.add_process(201, "", Some(4096), "");
        fs.add_file("/proc/self/status", "Name:\tself\nVmRSS:\t1 kB\n");
        fs.add_dir("/proc/sys");
        fs
    }

    /// `sda` (HDD), `nvme0n1` (NVMe) and a `loop0` to be filtered out.
    pub fn disk_inventory() -> Self {
        let mut fs = Self::new();
        fs.add_block_device("sda", 2048, true);
        fs.add_block_device("loop0", 1024, false);
        fs.add_block_device("nvme0n1", 4096, false);
        fs
    }

    /// Block-backed and pseudo filesystem rows.
    pub fn mixed_mounts() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/mounts",
            "\
/dev/sda1 / ext4 rw,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec 0 0
/dev/sdb2 /home xfs rw,noatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev 0 0
",
        );
        fs
    }

    /// `os-release` mixing quoted and bare values.
    pub fn quoted_os_release() -> Self {
        let mut fs = Self::new();
        fs.add_file("/etc/os-release", "NAME=\"Ubuntu\"\nVERSION_ID=22.04\n");
        fs
    }

    /// Per-cpu directories with topology but no `cpufreq`.
    pub fn no_cpufreq() -> Self {
        let mut fs = Self::new();
        fs.add_cpu(0, 0, 0, None);
        fs.add_cpu(1, 0, 1, None);
        fs
    }
}
