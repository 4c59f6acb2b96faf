//! 列スキーマ
//!
//! チケット表の列位置をヘッダー行の列名から一度だけ解決する。
//! 列名が見つからない場合は設定エラーとし、位置ずれによる誤読を防ぐ。
//! 旧来の固定位置レイアウト（4, 7, 8, 16, 18）も選択できる。

use crate::error::{Error, Result};
use crate::types::{Cell, RawGrid};
use serde::{Deserialize, Serialize};

/// 検索で使うチケットのフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketField {
    /// 件名（列E）
    Subject,
    /// 車種（列H）
    VehicleModel,
    /// チケット説明（列I、故障コードを含む）
    Description,
    /// 技術者とのやり取り（列Q）
    Exchanges,
    /// 整備工場との最終やり取り（列S）
    LastGarageExchange,
}

impl TicketField {
    /// 受け付けるヘッダー名（折りたたみ済み、優先順）
    fn header_names(&self) -> &'static [&'static str] {
        match self {
            TicketField::Subject => &["sujet", "subject"],
            TicketField::VehicleModel => &["modele voiture", "modele", "vehicle model"],
            TicketField::Description => &["description ticket", "description"],
            TicketField::Exchanges => &["echanges", "exchanges"],
            TicketField::LastGarageExchange => &["dernier echange garage", "last garage exchange"],
        }
    }

    /// 固定レイアウトでの列位置（0始まり）
    fn legacy_index(&self) -> usize {
        match self {
            TicketField::Subject => 4,
            TicketField::VehicleModel => 7,
            TicketField::Description => 8,
            TicketField::Exchanges => 16,
            TicketField::LastGarageExchange => 18,
        }
    }
}

impl std::fmt::Display for TicketField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketField::Subject => write!(f, "sujet"),
            TicketField::VehicleModel => write!(f, "modèle voiture"),
            TicketField::Description => write!(f, "description ticket"),
            TicketField::Exchanges => write!(f, "échanges"),
            TicketField::LastGarageExchange => write!(f, "dernier échange garage"),
        }
    }
}

/// 列解決の方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLayout {
    /// ヘッダー行の列名から解決
    #[default]
    Header,
    /// 固定位置
    Positional,
}

impl ColumnLayout {
    pub fn resolve(&self, grid: &RawGrid) -> Result<ColumnSchema> {
        match self {
            ColumnLayout::Header => {
                let header = grid.header().ok_or(Error::MissingHeader)?;
                ColumnSchema::from_header(header)
            }
            ColumnLayout::Positional => Ok(ColumnSchema::positional()),
        }
    }
}

impl std::str::FromStr for ColumnLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" | "headers" => Ok(ColumnLayout::Header),
            "positional" | "fixed" => Ok(ColumnLayout::Positional),
            _ => Err(format!("Unknown layout: {}. Use header or positional", s)),
        }
    }
}

impl std::fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnLayout::Header => write!(f, "header"),
            ColumnLayout::Positional => write!(f, "positional"),
        }
    }
}

/// フィールド → 列位置のマッピング
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    subject: usize,
    vehicle_model: usize,
    description: usize,
    exchanges: usize,
    last_garage_exchange: usize,
}

impl ColumnSchema {
    /// 固定位置レイアウト
    pub fn positional() -> Self {
        Self {
            subject: TicketField::Subject.legacy_index(),
            vehicle_model: TicketField::VehicleModel.legacy_index(),
            description: TicketField::Description.legacy_index(),
            exchanges: TicketField::Exchanges.legacy_index(),
            last_garage_exchange: TicketField::LastGarageExchange.legacy_index(),
        }
    }

    /// ヘッダー行から列位置を解決
    ///
    /// 同名の列が複数ある場合は最初の列を使う。
    pub fn from_header(header: &[Cell]) -> Result<Self> {
        let folded: Vec<String> = header.iter().map(|c| fold_header(&c.as_text())).collect();

        let find = |field: TicketField| -> Result<usize> {
            field
                .header_names()
                .iter()
                .find_map(|name| folded.iter().position(|h| h == name))
                .ok_or_else(|| Error::MissingColumn {
                    field: field.to_string(),
                    expected: field
                        .header_names()
                        .iter()
                        .map(|n| format!("\"{}\"", n))
                        .collect::<Vec<_>>()
                        .join(", "),
                })
        };

        Ok(Self {
            subject: find(TicketField::Subject)?,
            vehicle_model: find(TicketField::VehicleModel)?,
            description: find(TicketField::Description)?,
            exchanges: find(TicketField::Exchanges)?,
            last_garage_exchange: find(TicketField::LastGarageExchange)?,
        })
    }

    pub fn index(&self, field: TicketField) -> usize {
        match field {
            TicketField::Subject => self.subject,
            TicketField::VehicleModel => self.vehicle_model,
            TicketField::Description => self.description,
            TicketField::Exchanges => self.exchanges,
            TicketField::LastGarageExchange => self.last_garage_exchange,
        }
    }
}

/// ヘッダー名の比較用形式（小文字・空白圧縮・アクセント除去）
fn fold_header(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .chars()
        .map(strip_accent)
        .collect()
}

fn strip_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' => 'i',
        'ô' | 'ö' => 'o',
        'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        _ => c,
    }
}
