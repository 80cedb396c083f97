use std::time::Duration;

/// 将耗时格式化为`"<时> h <分> m <秒>.<微秒>s"`
///
/// 微秒部分不补零，例如 1.5 秒为`"0 h 0 m 1.500000s"`，1 分 2 秒零 7 微秒为`"0 h 1 m 2.7s"`
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!(
        "{} h {} m {}.{}s",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60,
        elapsed.subsec_micros()
    )
}
