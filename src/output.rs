use ethers::utils::to_checksum;
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::config::{ClaimTimestamp, ClaimType, OutputType, ShowConfig};
use crate::error::Result;
use crate::rewards::RewardsView;
use crate::tokens::TokenNameResolver;
use crate::utils::write_to_file;

const HEADERS: [&str; 3] = ["Token Name", "Token Address", "Amount (Wei)"];
const WIDTHS: [usize; 3] = [20, 46, 30];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRow {
    #[serde(rename = "tokenName")]
    pub token_name: String,
    #[serde(rename = "tokenAddress")]
    pub token_address: String,
    /// Exact decimal wei amount.
    pub amount: String,
}

pub async fn build_rows<T>(rewards: &RewardsView, resolver: &T) -> Vec<RewardRow>
where
    T: TokenNameResolver + Sync + ?Sized,
{
    let mut rows = Vec::with_capacity(rewards.len());
    for (token, amount) in rewards {
        rows.push(RewardRow {
            token_name: resolver.get_token_name(*token).await,
            token_address: to_checksum(token, None),
            amount: amount.to_str_radix(10),
        });
    }
    rows
}

pub fn render_json(rows: &[RewardRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

pub fn root_banner(claim_timestamp: ClaimTimestamp) -> &'static str {
    match claim_timestamp {
        ClaimTimestamp::Latest => {
            "> Showing rewards for latest root (can contain non-claimable rewards)"
        }
        ClaimTimestamp::LatestActive => {
            "> Showing rewards for latest active root (only claimable rewards)"
        }
    }
}

pub fn section_title(claim_type: ClaimType) -> String {
    let dashes = "-".repeat(30);
    format!("{} {} {}", dashes, claim_type.title(), dashes)
}

/// Prints the bordered rewards table. Cells are padded to their column width
/// and never truncated.
pub fn write_table<W: Write>(out: &mut W, rows: &[RewardRow]) -> std::io::Result<()> {
    write_border(out, '+')?;

    for (header, width) in HEADERS.iter().zip(WIDTHS) {
        write!(out, "| {:<width$}", header, width = width)?;
    }
    writeln!(out, "|")?;

    write_border(out, '|')?;

    for row in rows {
        writeln!(
            out,
            "| {:<w0$}| {:<w1$}| {:<w2$}|",
            row.token_name,
            row.token_address,
            row.amount,
            w0 = WIDTHS[0],
            w1 = WIDTHS[1],
            w2 = WIDTHS[2],
        )?;
    }

    write_border(out, '+')
}

fn write_border<W: Write>(out: &mut W, corner: char) -> std::io::Result<()> {
    for width in WIDTHS {
        write!(out, "{}{}", corner, "-".repeat(width + 1))?;
    }
    writeln!(out, "{}", corner)
}

/// Writes the rewards in the configured format. JSON goes to the output
/// file when one is set; everything else goes to `out`.
pub fn emit<W: Write>(config: &ShowConfig, rows: &[RewardRow], out: &mut W) -> Result<()> {
    match config.output_type {
        OutputType::Json => {
            let json = render_json(rows)?;
            match &config.output {
                Some(path) => {
                    write_to_file(json.as_bytes(), path)?;
                    info!("Rewards written to {}", path.display());
                }
                None => writeln!(out, "{}", json)?,
            }
        }
        OutputType::Table => {
            writeln!(out)?;
            writeln!(out, "{}", root_banner(config.claim_timestamp))?;
            writeln!(out)?;
            writeln!(out, "{}", section_title(config.claim_type))?;
            write_table(out, rows)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::MockTokenNameResolver;
    use ethers::types::Address;
    use num_bigint::BigUint;

    fn row(name: &str, amount: &str) -> RewardRow {
        RewardRow {
            token_name: name.to_string(),
            token_address: "0xAcc1fb458a1317E886dB376Fc8141540537E68fE".to_string(),
            amount: amount.to_string(),
        }
    }

    fn table(rows: &[RewardRow]) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_table_layout() {
        let rendered = table(&[row("Eigen", "1000")]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);

        let border = format!(
            "+{}+{}+{}+",
            "-".repeat(21),
            "-".repeat(47),
            "-".repeat(31)
        );
        assert_eq!(lines[0], border);
        assert_eq!(lines[4], border);
        assert_eq!(
            lines[1],
            format!(
                "| {:<20}| {:<46}| {:<30}|",
                "Token Name", "Token Address", "Amount (Wei)"
            )
        );
        assert_eq!(
            lines[2],
            format!(
                "|{}|{}|{}|",
                "-".repeat(21),
                "-".repeat(47),
                "-".repeat(31)
            )
        );
        assert_eq!(
            lines[3],
            format!(
                "| {:<20}| {:<46}| {:<30}|",
                "Eigen", "0xAcc1fb458a1317E886dB376Fc8141540537E68fE", "1000"
            )
        );
        for line in &lines {
            assert_eq!(line.len(), 1 + 21 + 1 + 47 + 1 + 31 + 1);
        }
    }

    #[test]
    fn test_table_empty_name_keeps_width() {
        let rendered = table(&[row("", "0")]);
        let data = rendered.lines().nth(3).unwrap();
        assert!(data.starts_with(&format!("| {}|", " ".repeat(20))));
        assert_eq!(data.len(), 103);
    }

    #[test]
    fn test_table_long_values_are_not_truncated() {
        let long_name = "A Token With An Unusually Long Name";
        let long_amount = (BigUint::from(1u8) << 300u32).to_string();
        let rendered = table(&[row(long_name, &long_amount)]);
        let data = rendered.lines().nth(3).unwrap();
        assert!(data.contains(long_name));
        assert!(data.contains(&long_amount));
        assert_eq!(
            data,
            format!(
                "| {}| {:<46}| {}|",
                long_name, "0xAcc1fb458a1317E886dB376Fc8141540537E68fE", long_amount
            )
        );
    }

    #[test]
    fn test_section_titles() {
        let dashes = "-".repeat(30);
        assert_eq!(
            section_title(ClaimType::All),
            format!("{} Lifetime Rewards {}", dashes, dashes)
        );
        assert_eq!(
            section_title(ClaimType::Claimed),
            format!("{} Claimed Rewards {}", dashes, dashes)
        );
        assert_eq!(
            section_title(ClaimType::Unclaimed),
            format!("{} Unclaimed Rewards {}", dashes, dashes)
        );
    }

    #[test]
    fn test_json_keeps_exact_amounts() {
        let big = (BigUint::from(3u8) << 300u32) + 12345u32;
        let rows = vec![row("Eigen", &big.to_string())];
        let json = render_json(&rows).unwrap();

        assert!(json.starts_with("[\n  {\n    \"tokenName\": \"Eigen\""));
        let parsed: Vec<RewardRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rows);
        assert_eq!(
            BigUint::parse_bytes(parsed[0].amount.as_bytes(), 10).unwrap(),
            big
        );
    }

    #[tokio::test]
    async fn test_build_rows_uses_checksum_and_names() {
        let token: Address = "0xacc1fb458a1317e886db376fc8141540537e68fe".parse().unwrap();
        let mut resolver = MockTokenNameResolver::new();
        resolver
            .expect_get_token_name()
            .returning(|_| "Bonus Token".to_string());

        let rewards: RewardsView = [(token, BigUint::from(5u32))].into_iter().collect();
        let rows = build_rows(&rewards, &resolver).await;
        assert_eq!(
            rows,
            vec![RewardRow {
                token_name: "Bonus Token".to_string(),
                token_address: "0xAcc1fb458a1317E886dB376Fc8141540537E68fE".to_string(),
                amount: "5".to_string(),
            }]
        );
    }
}
