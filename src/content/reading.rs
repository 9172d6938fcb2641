use super::Section;

/// 阅读速度（词/分钟）
pub const WORDS_PER_MINUTE: usize = 200;

/// 统计所有标题和正文片段中以空白分隔的词数
///
/// 正文片段只统计其 `text` 字段，其余结构不做解释。
pub fn count_words(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|s| {
            let heading = s.heading.split_whitespace().count();
            let body: usize = s
                .body
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|fragment| fragment.get("text").and_then(|t| t.as_str()))
                .map(|text| text.split_whitespace().count())
                .sum();
            heading + body
        })
        .sum()
}

/// 计算预计阅读时间，向上取整到分钟
///
/// 没有内容时返回 0，超出 `u32` 时取最大值。
pub fn compute_reading_time(sections: &[Section]) -> u32 {
    minutes(count_words(sections))
}

fn minutes(words: usize) -> u32 {
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}
