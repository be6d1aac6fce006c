use kss_core::units::format_kss;

use crate::ranking::RichList;

pub const TABLE_WIDTH: usize = 64;

/// Console table: header, one row per holder, total under the balance column.
pub fn render_table(list: &RichList) -> String {
    let rule = "-".repeat(TABLE_WIDTH);
    let mut lines = Vec::with_capacity(list.holders.len() + 7);

    lines.push(rule.clone());
    lines.push(format!("{:^width$}", "KSS Rich List", width = TABLE_WIDTH));
    lines.push(format!("Last Updated: {}", list.last_updated));
    lines.push("  #    Address                                      Balance".to_string());
    lines.push(rule.clone());
    for (rank, holder) in list.holders.iter().enumerate() {
        lines.push(format!(
            "{:>6} {:<38} {:>18}",
            rank + 1,
            holder.address,
            format_kss(holder.balance)
        ));
    }
    lines.push(rule);
    lines.push(format!(
        "{:>width$}",
        format_kss(list.total_balance),
        width = TABLE_WIDTH
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
