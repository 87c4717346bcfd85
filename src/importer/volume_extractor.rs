// ==========================================
// 库存管理系统 - 容量提取
// ==========================================
// 从商品名称 + 规格描述中提取容量（毫升）
// 例: "Vodka 750ml" → 750, "Gin 25 oz" → 750
// ==========================================

/// 容量后缀及换算系数（按优先级）
const VOLUME_SUFFIXES: &[(&str, f64)] = &[("ml", 1.0), ("oz", 30.0), ("fl oz", 30.0)];

/// 提取容量（毫升）
///
/// # 规则
/// - 文本 = 小写(name + " " + variant)
/// - 每个后缀只看首次出现位置；位于开头则该后缀无结果
/// - 自后缀向前收集数字与小数点，跳过空格，遇其他字符停止
/// - 数值解析成功即返回 trunc(数值 × 系数)，否则尝试下一后缀
///
/// # 返回
/// - 0: 无法提取
pub fn extract_volume_ml(name: &str, variant: &str) -> i32 {
    let text = format!("{} {}", name, variant).to_lowercase();
    let bytes = text.as_bytes();

    for (suffix, multiplier) in VOLUME_SUFFIXES {
        let idx = match text.find(suffix) {
            Some(idx) if idx > 0 => idx,
            _ => continue,
        };

        let mut digits = Vec::new();
        for &ch in bytes[..idx].iter().rev() {
            match ch {
                b'0'..=b'9' | b'.' => digits.push(ch),
                b' ' => continue,
                _ => break,
            }
        }
        digits.reverse();

        // 仅含 ASCII 数字与小数点
        let number = String::from_utf8_lossy(&digits);
        if let Ok(value) = number.parse::<f64>() {
            return (value * multiplier) as i32;
        }
    }

    0
}
