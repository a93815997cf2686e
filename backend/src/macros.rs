//! Shared macros for the backend crate.

/// Generate a `fmt::Debug` implementation that hides credentials.
///
/// Each field is listed with one of:
///
/// - `show field_name` - prints the field value normally
/// - `redact field_name` - prints `"[REDACTED]"` instead of the value
/// - `redact_option field_name` - prints `Some("[REDACTED]")` or `None`
///
/// # Example
///
/// ```ignore
/// redacted_debug!(AzureTableConfig {
///     show account_name,
///     redact account_key,
///     show table_name,
/// });
/// ```
macro_rules! redacted_debug {
    ($name:ident { $( $kind:ident $field:ident ),* $(,)? }) => {
        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut s = f.debug_struct(stringify!($name));
                $( redacted_debug!(@add_field s, self, $kind, $field); )*
                s.finish_non_exhaustive()
            }
        }
    };
    (@add_field $s:ident, $self:ident, show, $field:ident) => {
        $s.field(stringify!($field), &$self.$field);
    };
    (@add_field $s:ident, $self:ident, redact, $field:ident) => {
        $s.field(stringify!($field), &"[REDACTED]");
    };
    (@add_field $s:ident, $self:ident, redact_option, $field:ident) => {
        $s.field(stringify!($field), &$self.$field.as_ref().map(|_| "[REDACTED]"));
    };
}

#[cfg(test)]
mod tests {
    #[allow(dead_code)]
    struct StoreSettings {
        pub table: String,
        pub connection_string: String,
        pub proxy_password: Option<String>,
    }

    redacted_debug!(StoreSettings {
        show table,
        redact connection_string,
        redact_option proxy_password,
    });

    #[test]
    fn test_redacted_fields_are_hidden() {
        let s = StoreSettings {
            table: "EmployeeAuditLog".to_string(),
            connection_string: "AccountName=rh;AccountKey=c2VjcmV0".to_string(),
            proxy_password: Some("pr0xy".to_string()),
        };
        let output = format!("{:?}", s);
        assert!(output.contains("EmployeeAuditLog"));
        assert!(!output.contains("c2VjcmV0"));
        assert!(!output.contains("pr0xy"));
        assert!(output.contains("[REDACTED]"));
    }

    #[test]
    fn test_redacted_option_none() {
        let s = StoreSettings {
            table: "AuditLog".to_string(),
            connection_string: "UseDevelopmentStorage=true".to_string(),
            proxy_password: None,
        };
        let output = format!("{:?}", s);
        assert!(output.contains("None"));
        assert!(!output.contains("UseDevelopmentStorage"));
    }
}
