//! Column names and the shared schemas that the normalizer, the rule validator and the
//! persisted CSVs all agree on.

use crate::types::{DataType, Field, Schema};

/// First cell of the indicator table's header row.
pub const INDICATOR_TYPE: &str = "Tipo Indicador";
pub const DATA_TYPE: &str = "Tipo Dato";
/// Indicator name column; also the column whose first blank cell ends the data block.
pub const INDICATOR_NAME: &str = "Indicadores de Gestion";
pub const WEIGHT: &str = "Ponderacion";
pub const TARGET_ACCEPTABLE: &str = "Objetivo Aceptable (70%)";
pub const TARGET_VERY_GOOD: &str = "Objetivo Muy Bueno (90%)";
pub const TARGET_EXCELLENT: &str = "Objetivo Excelente (120%)";
pub const RESULT: &str = "Resultado";
pub const ACHIEVEMENT: &str = "% Logro";
pub const RATING: &str = "Calificación";
pub const LAST_UPDATE: &str = "Ultima Fecha de Actualización";
pub const REVIEWER: &str = "Lider Revisor";
pub const COMMENT: &str = "Comentario";

pub const ROLE: &str = "Cargo";
pub const NATIONAL_ID: &str = "CUIL";
pub const SEGMENT: &str = "Segmento";
pub const INFLUENCE_AREA: &str = "Área de influencia";
pub const SUBMITTER: &str = "Nombre Lider";
pub const PERIOD: &str = "Fecha_Nombre_Archivo";
pub const BRANCH: &str = "Sucursal";
pub const UPLOADED_AT: &str = "Fecha Horario Subida";

pub const COMMISSIONS: &str = "COMISIONES ACCESORIAS";
pub const OVERTIME_50: &str = "HS EXTRAS AL 50";
pub const OVERTIME_100: &str = "HS EXTRAS AL 100";
pub const PRODUCTIVITY_INCENTIVE: &str = "INCENTIVO PRODUCTIVIDAD";
pub const INCENTIVE_ADJUSTMENT: &str = "AJUSTE INCENTIVO";

/// Accelerator columns, in the order they are read from the sheet.
pub const ACCELERATOR_COLUMNS: [&str; 6] = [
    "Indicador 1",
    "Indicador 2",
    "Indicador 3",
    "Indicador 4",
    "Indicador 5",
    "Indicador 6",
];

/// The 13 columns every indicator table must carry (exact header text).
pub fn indicator_schema() -> Schema {
    Schema::new(vec![
        Field::new(INDICATOR_TYPE, DataType::Utf8),
        Field::new(DATA_TYPE, DataType::Utf8),
        Field::new(INDICATOR_NAME, DataType::Utf8),
        Field::new(WEIGHT, DataType::Float64),
        Field::new(TARGET_ACCEPTABLE, DataType::Float64),
        Field::new(TARGET_VERY_GOOD, DataType::Float64),
        Field::new(TARGET_EXCELLENT, DataType::Float64),
        Field::new(RESULT, DataType::Float64),
        Field::new(ACHIEVEMENT, DataType::Float64),
        Field::new(RATING, DataType::Utf8),
        Field::new(LAST_UPDATE, DataType::Date),
        Field::new(REVIEWER, DataType::Utf8),
        Field::new(COMMENT, DataType::Utf8),
    ])
}

/// Identity and submission metadata prepended to every output row.
pub fn identity_schema() -> Schema {
    Schema::new(
        [
            ROLE,
            NATIONAL_ID,
            SEGMENT,
            INFLUENCE_AREA,
            SUBMITTER,
            PERIOD,
            BRANCH,
            UPLOADED_AT,
        ]
        .into_iter()
        .map(|name| Field::new(name, DataType::Utf8))
        .collect(),
    )
}

/// Accessory compensation figures carried by fixed-form sheets.
pub fn compensation_schema() -> Schema {
    Schema::new(
        [
            COMMISSIONS,
            OVERTIME_50,
            OVERTIME_100,
            PRODUCTIVITY_INCENTIVE,
            INCENTIVE_ADJUSTMENT,
        ]
        .into_iter()
        .map(|name| Field::new(name, DataType::Float64))
        .collect(),
    )
}

/// Base output layout: identity columns followed by the indicator columns.
pub fn base_output_schema() -> Schema {
    identity_schema().extended(&indicator_schema())
}

/// One accelerator row per sellers sheet.
pub fn accelerators_schema() -> Schema {
    let mut fields = vec![Field::new(NATIONAL_ID, DataType::Utf8)];
    fields.extend(
        ACCELERATOR_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64)),
    );
    Schema::new(fields)
}

/// Columns the HR summary sheet must carry (header text is trimmed before matching).
pub fn hr_summary_schema() -> Schema {
    let text = ["Sucursal", "Vendedores", "CUIT", "LEGAJO"]
        .into_iter()
        .map(|name| Field::new(name, DataType::Utf8));
    let amounts = [
        "Total Ventas",
        "Vta PPAA",
        "Descuentos PPAA",
        "COMISION PPAA",
        "0km",
        "Usados",
        "Premio Convencional",
        "Comision Convencional",
        "Total a liquidar",
    ]
    .into_iter()
    .map(|name| Field::new(name, DataType::Float64));
    Schema::new(text.chain(amounts).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_layouts_have_the_documented_widths() {
        assert_eq!(indicator_schema().fields.len(), 13);
        assert_eq!(base_output_schema().fields.len(), 21);
        assert_eq!(accelerators_schema().fields.len(), 7);
        assert_eq!(hr_summary_schema().fields.len(), 13);
    }

    #[test]
    fn output_order_is_identity_then_indicators() {
        let schema = base_output_schema();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names[0], ROLE);
        assert_eq!(names[7], UPLOADED_AT);
        assert_eq!(names[8], INDICATOR_TYPE);
        assert_eq!(names[20], COMMENT);
    }
}
