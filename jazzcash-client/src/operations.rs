//! Per-operation wire contracts: required fields, hash field order, endpoint and envelope.

use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

/// Which caller-overridable default an operation seeds the record with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultField {
    Currency,
    Language,
}

impl DefaultField {
    pub fn field_name(self) -> &'static str {
        match self {
            DefaultField::Currency => "pp_TxnCurrency",
            DefaultField::Language => "pp_Language",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Authorize,
    Capture,
    Void,
    Refund,
    StatusInquiry,
    DirectPay,
    MobileAccount,
    Voucher,
    ThreeDsEnrollment,
    ProcessAcs,
}

#[derive(Debug)]
pub struct OperationSpec {
    /// Wire name; also the endpoint override key and the envelope prefix.
    pub name: &'static str,
    pub default_path: &'static str,
    pub required_fields: &'static [&'static str],
    pub field_order: &'static [&'static str],
    /// Outer object name the record is wrapped in, if any.
    pub envelope: Option<&'static str>,
    /// Operation constants that caller input cannot change.
    pub pinned: &'static [(&'static str, &'static str)],
    pub defaults: &'static [DefaultField],
}

const CARD_PAYMENT_ORDER: &[&str] = &[
    "pp_InstrumentType",
    "pp_TxnRefNo",
    "pp_Amount",
    "pp_TxnCurrency",
    "pp_CustomerCardNumber",
    "pp_CustomerCardExpiry",
    "pp_CustomerCardCvv",
    "pp_MerchantID",
    "pp_Password",
    "pp_Frequency",
];

const CARD_PAYMENT_REQUIRED: &[&str] = &[
    "pp_TxnRefNo",
    "pp_Amount",
    "pp_CustomerCardNumber",
    "pp_CustomerCardExpiry",
    "pp_CustomerCardCvv",
    "pp_Frequency",
];

const AMOUNT_ORDER: &[&str] = &[
    "pp_TxnRefNo",
    "pp_Amount",
    "pp_TxnCurrency",
    "pp_MerchantID",
    "pp_Password",
];

const WALLET_ORDER: &[&str] = &[
    "pp_Version",
    "pp_TxnType",
    "pp_Language",
    "pp_MerchantID",
    "pp_SubMerchantID",
    "pp_Password",
    "pp_TxnRefNo",
    "pp_Amount",
    "pp_TxnCurrency",
    "pp_TxnDateTime",
    "pp_BillReference",
    "pp_Description",
    "pp_TxnExpiryDateTime",
    "pp_ReturnURL",
];

const REF_AND_AMOUNT: &[&str] = &["pp_TxnRefNo", "pp_Amount"];

const CARD_INSTRUMENT: &[(&str, &str)] = &[("pp_InstrumentType", "Card")];
const WALLET_TXN: &[(&str, &str)] = &[("pp_TxnType", "MWALLET")];

static AUTHORIZE: OperationSpec = OperationSpec {
    name: "AUTHORIZE",
    default_path: "/authorize/AuthorizePayment",
    required_fields: CARD_PAYMENT_REQUIRED,
    field_order: CARD_PAYMENT_ORDER,
    envelope: Some("AUTHORIZERequest"),
    pinned: CARD_INSTRUMENT,
    defaults: &[DefaultField::Currency],
};

static CAPTURE: OperationSpec = OperationSpec {
    name: "CAPTURE",
    default_path: "/authorize/Capture",
    required_fields: REF_AND_AMOUNT,
    field_order: AMOUNT_ORDER,
    envelope: Some("CAPTURERequest"),
    pinned: &[],
    defaults: &[DefaultField::Currency],
};

static VOID: OperationSpec = OperationSpec {
    name: "VOID",
    default_path: "/authorize/Void",
    required_fields: &["pp_TxnRefNo"],
    field_order: &["pp_TxnRefNo", "pp_MerchantID", "pp_Password"],
    envelope: Some("VOIDRequest"),
    pinned: &[],
    defaults: &[DefaultField::Currency],
};

static REFUND: OperationSpec = OperationSpec {
    name: "REFUND",
    default_path: "/authorize/Refund",
    required_fields: REF_AND_AMOUNT,
    field_order: AMOUNT_ORDER,
    envelope: Some("REFUNDRequest"),
    pinned: &[],
    defaults: &[DefaultField::Currency],
};

static STATUS: OperationSpec = OperationSpec {
    name: "STATUS",
    default_path: "/PaymentInquiry/Inquire",
    required_fields: &["pp_TxnRefNo"],
    field_order: &["pp_TxnRefNo", "pp_MerchantID", "pp_Password", "pp_Version"],
    envelope: None,
    pinned: &[],
    defaults: &[DefaultField::Currency],
};

static DIRECT_PAY: OperationSpec = OperationSpec {
    name: "DIRECT_PAY",
    default_path: "/DirectPay",
    required_fields: CARD_PAYMENT_REQUIRED,
    field_order: CARD_PAYMENT_ORDER,
    envelope: Some("DIRECT_PAYRequest"),
    pinned: CARD_INSTRUMENT,
    defaults: &[DefaultField::Currency],
};

static MOBILE: OperationSpec = OperationSpec {
    name: "MOBILE",
    default_path: "/Purchase/DoMWalletTransaction",
    required_fields: REF_AND_AMOUNT,
    field_order: WALLET_ORDER,
    envelope: None,
    pinned: WALLET_TXN,
    defaults: &[DefaultField::Language, DefaultField::Currency],
};

// Voucher requests reuse the wallet contract, including the MWALLET type.
static VOUCHER: OperationSpec = OperationSpec {
    name: "VOUCHER",
    default_path: "/VOUCHER",
    required_fields: REF_AND_AMOUNT,
    field_order: WALLET_ORDER,
    envelope: None,
    pinned: WALLET_TXN,
    defaults: &[DefaultField::Language, DefaultField::Currency],
};

static THREE_DS_ENROLL: OperationSpec = OperationSpec {
    name: "3DS_ENROLL",
    default_path: "/Purchase/Check3DsEnrollment",
    required_fields: &[
        "pp_TxnRefNo",
        "pp_Amount",
        "pp_CustomerCardNumber",
        "pp_CustomerCardExpiry",
        "pp_CustomerCardCvv",
    ],
    field_order: &[
        "pp_Version",
        "pp_TxnType",
        "pp_TxnRefNo",
        "pp_Amount",
        "pp_TxnCurrency",
        "pp_TxnDateTime",
        "pp_TxnExpiryDateTime",
        "pp_BillReference",
        "pp_Description",
        "pp_CustomerCardNumber",
        "pp_CustomerCardExpiry",
        "pp_CustomerCardCvv",
        "pp_MerchantID",
        "pp_Password",
    ],
    envelope: None,
    pinned: &[("pp_TxnType", "MPAY")],
    defaults: &[DefaultField::Currency],
};

static PROCESS_ACS: OperationSpec = OperationSpec {
    name: "PROCESS_ACS",
    default_path: "/ProcessACS",
    required_fields: &["pp_TxnRefNo", "pp_3dSecureID", "paRes"],
    field_order: &[
        "pp_Version",
        "pp_TxnType",
        "pp_TxnRefNo",
        "pp_3dSecureID",
        "pp_TxnDateTime",
        "pp_TxnExpiryDateTime",
        "pp_BillReference",
        "pp_Description",
        "paRes",
        "pp_MerchantID",
        "pp_Password",
    ],
    envelope: None,
    pinned: &[],
    defaults: &[],
};

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Authorize,
        OperationKind::Capture,
        OperationKind::Void,
        OperationKind::Refund,
        OperationKind::StatusInquiry,
        OperationKind::DirectPay,
        OperationKind::MobileAccount,
        OperationKind::Voucher,
        OperationKind::ThreeDsEnrollment,
        OperationKind::ProcessAcs,
    ];

    pub fn spec(self) -> &'static OperationSpec {
        match self {
            OperationKind::Authorize => &AUTHORIZE,
            OperationKind::Capture => &CAPTURE,
            OperationKind::Void => &VOID,
            OperationKind::Refund => &REFUND,
            OperationKind::StatusInquiry => &STATUS,
            OperationKind::DirectPay => &DIRECT_PAY,
            OperationKind::MobileAccount => &MOBILE,
            OperationKind::Voucher => &VOUCHER,
            OperationKind::ThreeDsEnrollment => &THREE_DS_ENROLL,
            OperationKind::ProcessAcs => &PROCESS_ACS,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = GatewayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| GatewayError::InvalidArgument(format!("invalid API type: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SYSTEM_FIELDS;

    #[test]
    fn names_round_trip_and_unknown_is_rejected() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.name().parse::<OperationKind>().expect("known"), kind);
        }
        assert_eq!("status".parse::<OperationKind>().expect("lowercase"), OperationKind::StatusInquiry);
        let err = "SETTLE".parse::<OperationKind>().expect_err("unknown");
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
    }

    #[test]
    fn field_orders_have_no_duplicates() {
        for kind in OperationKind::ALL {
            let order = kind.spec().field_order;
            for (i, field) in order.iter().enumerate() {
                assert!(!order[i + 1..].contains(field), "{kind}: duplicate {field}");
            }
        }
    }

    #[test]
    fn required_fields_never_include_system_fields() {
        for kind in OperationKind::ALL {
            let spec = kind.spec();
            for field in spec.required_fields {
                assert!(!SYSTEM_FIELDS.contains(field), "{kind} requires {field}");
                assert!(!spec.pinned.iter().any(|(name, _)| name == field));
            }
        }
    }

    #[test]
    fn only_card_operations_use_an_envelope() {
        let enveloped: Vec<_> = OperationKind::ALL
            .into_iter()
            .filter_map(|kind| kind.spec().envelope)
            .collect();
        assert_eq!(
            enveloped,
            vec![
                "AUTHORIZERequest",
                "CAPTURERequest",
                "VOIDRequest",
                "REFUNDRequest",
                "DIRECT_PAYRequest"
            ]
        );
    }

    #[test]
    fn authorize_order_is_the_wire_contract() {
        assert_eq!(
            OperationKind::Authorize.spec().field_order,
            &[
                "pp_InstrumentType",
                "pp_TxnRefNo",
                "pp_Amount",
                "pp_TxnCurrency",
                "pp_CustomerCardNumber",
                "pp_CustomerCardExpiry",
                "pp_CustomerCardCvv",
                "pp_MerchantID",
                "pp_Password",
                "pp_Frequency",
            ]
        );
    }
}
