//! Standard identity record layouts
//!
//! Both variants share one table of fields and fragment kinds; the compromised
//! variant only adds a breach id after the record id.

use super::fragment::{FragmentColumn, FragmentSpec, BREACH_ID_COLUMN};

const RECORD_ID: &str = "record_id";

const NAME_FIELDS: &[&str] = &["first_name", "last_name", "middle_initial", "suffix"];
const ADDRESS_FIELDS: &[&str] = &["address_line_1", "address_line_2", "city", "state", "zip"];

/// Input fields after the record id (and breach id), in order
const IDENTITY_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "middle_initial",
    "suffix",
    "dob",
    "ssn",
    "address_line_1",
    "address_line_2",
    "city",
    "state",
    "zip",
    "phone",
    "email",
];

struct KindDef {
    kind: &'static str,
    id_column: &'static str,
    groups: &'static [&'static [&'static str]],
    blanks: &'static [&'static str],
}

const KINDS: &[KindDef] = &[
    KindDef {
        kind: "name_dob",
        id_column: "name_id",
        groups: &[NAME_FIELDS, &["dob"]],
        blanks: &[],
    },
    KindDef {
        kind: "ssn",
        id_column: "ssn_id",
        groups: &[&["ssn"]],
        blanks: &[],
    },
    KindDef {
        kind: "address",
        id_column: "address_id",
        groups: &[ADDRESS_FIELDS],
        blanks: &["zip4"],
    },
    KindDef {
        kind: "phone",
        id_column: "phone_id",
        groups: &[&["phone"]],
        blanks: &[],
    },
    KindDef {
        kind: "email",
        id_column: "email_id",
        groups: &[&["email"]],
        blanks: &[],
    },
    KindDef {
        kind: "name_address",
        id_column: "name_address_id",
        groups: &[NAME_FIELDS, ADDRESS_FIELDS],
        blanks: &["zip4"],
    },
    KindDef {
        kind: "name_phone",
        id_column: "name_phone_id",
        groups: &[NAME_FIELDS, &["phone"]],
        blanks: &[],
    },
];

/// Field names for a standard record, with or without a breach id
pub(super) fn field_names(with_breach_id: bool) -> Vec<String> {
    let mut fields = vec![RECORD_ID.to_string()];
    if with_breach_id {
        fields.push(BREACH_ID_COLUMN.to_string());
    }
    fields.extend(IDENTITY_FIELDS.iter().map(|f| f.to_string()));
    fields
}

/// The standard fragment kinds resolved against `fields`
pub(super) fn fragment_specs(fields: &[String]) -> Vec<FragmentSpec> {
    let position = |name: &str| fields.iter().position(|f| f == name);
    let breach_id = position(BREACH_ID_COLUMN);

    KINDS
        .iter()
        .map(|def| {
            let columns = def
                .groups
                .iter()
                .flat_map(|group| group.iter())
                .filter_map(|name| position(*name).map(|p| FragmentColumn::field(*name, p)))
                .chain(def.blanks.iter().map(|name| FragmentColumn::blank(*name)))
                .collect();
            let spec = FragmentSpec::new(def.kind, def.id_column, columns);
            match breach_id {
                Some(p) => spec.with_breach_id(p),
                None => spec,
            }
        })
        .collect()
}
