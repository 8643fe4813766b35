//! The two remote configuration procedures and their row decoding.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::instrument;

use crate::error::{DataError, Result};
use crate::model::SettingRow;

const SHOW_CONFIGURATION_CALL: &str = "CALL mysql.rds_show_configuration";

const SET_CONFIGURATION_CALL: &str = "CALL mysql.rds_set_configuration(?, ?)";

/// Client for the instance's configuration procedures.
#[async_trait]
pub trait ProcedureClient: Send + Sync {
    /// Invoke the introspection procedure and decode every row.
    async fn show_configuration(&self) -> Result<Vec<SettingRow>>;

    /// Invoke the mutation procedure for a single setting.
    async fn set_configuration(&self, name: &str, value: i64) -> Result<()>;
}

#[async_trait]
impl ProcedureClient for MySqlPool {
    #[instrument(name = "procedures.show_configuration", skip(self))]
    async fn show_configuration(&self) -> Result<Vec<SettingRow>> {
        let rows = sqlx::raw_sql(SHOW_CONFIGURATION_CALL)
            .fetch_all(self)
            .await
            .map_err(|source| DataError::query("rds_show_configuration", source))?;

        rows.iter()
            .enumerate()
            .map(|(index, row)| decode_row(index, row))
            .collect()
    }

    #[instrument(name = "procedures.set_configuration", skip(self))]
    async fn set_configuration(&self, name: &str, value: i64) -> Result<()> {
        sqlx::query(SET_CONFIGURATION_CALL)
            .bind(name)
            .bind(value)
            .execute(self)
            .await
            .map_err(|source| DataError::query("rds_set_configuration", source))?;
        Ok(())
    }
}

fn decode_row(index: usize, row: &MySqlRow) -> Result<SettingRow> {
    let name: String = row
        .try_get(0)
        .map_err(|source| DataError::query("rds_show_configuration.name", source))?;
    let value = decode_value(index, row)?;
    let description: String = row
        .try_get(2)
        .map_err(|source| DataError::query("rds_show_configuration.description", source))?;

    Ok(SettingRow {
        name,
        value,
        description,
    })
}

/// Integer columns decode directly; text columns must hold a base-10 integer.
fn decode_value(index: usize, row: &MySqlRow) -> Result<Option<i64>> {
    match row.try_get::<Option<i64>, _>(1) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let text: Option<String> = row
                .try_get(1)
                .map_err(|source| DataError::query("rds_show_configuration.value", source))?;
            parse_value_text(index, text.as_deref())
        }
        Err(source) => Err(DataError::query("rds_show_configuration.value", source)),
    }
}

pub(crate) fn parse_value_text(index: usize, text: Option<&str>) -> Result<Option<i64>> {
    let Some(text) = text else {
        return Ok(None);
    };
    text.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| DataError::MalformedRow {
            row: index,
            reason: "setting value is not an integer",
            value: Some(text.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_text_accepts_integers_and_null() {
        assert_eq!(parse_value_text(0, None).expect("null"), None);
        assert_eq!(parse_value_text(0, Some("24")).expect("int"), Some(24));
        assert_eq!(parse_value_text(0, Some(" -7 ")).expect("int"), Some(-7));
    }

    #[test]
    fn parse_value_text_rejects_other_shapes() {
        for bad in ["", "ten", "1.5", "99999999999999999999"] {
            let err = parse_value_text(4, Some(bad)).unwrap_err();
            assert!(
                matches!(err, DataError::MalformedRow { row: 4, .. }),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn procedure_calls_are_stable() {
        assert_eq!(SHOW_CONFIGURATION_CALL, "CALL mysql.rds_show_configuration");
        assert_eq!(
            SET_CONFIGURATION_CALL,
            "CALL mysql.rds_set_configuration(?, ?)"
        );
    }
}
