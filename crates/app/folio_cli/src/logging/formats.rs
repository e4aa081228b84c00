use flexi_logger::{DeferredNow, Record, style};

/// `level: message`, with the level colored. Command output goes to stdout,
/// so log lines stay short.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(
        w,
        "{}: {}",
        style(level).paint(level.as_str().to_lowercase()),
        record.args()
    )
}
