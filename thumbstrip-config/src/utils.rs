use knuffel::errors::DecodeError;

/// Number that can be written either as an integer or a decimal in the config.
// MIN and MAX generics are only used during parsing to check the value.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FloatOrInt<const MIN: i32, const MAX: i32>(pub f64);

impl<const MIN: i32, const MAX: i32> FloatOrInt<MIN, MAX> {
    fn in_range(value: f64) -> bool {
        (f64::from(MIN)..=f64::from(MAX)).contains(&value)
    }
}

impl<S: knuffel::traits::ErrorSpan, const MIN: i32, const MAX: i32> knuffel::DecodeScalar<S>
    for FloatOrInt<MIN, MAX>
{
    fn type_check(
        type_name: &Option<knuffel::span::Spanned<knuffel::ast::TypeName, S>>,
        ctx: &mut knuffel::decode::Context<S>,
    ) {
        if let Some(type_name) = &type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }
    }

    fn raw_decode(
        val: &knuffel::span::Spanned<knuffel::ast::Literal, S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        let value = match &**val {
            knuffel::ast::Literal::Int(ref value) => match i32::try_from(value) {
                Ok(v) => f64::from(v),
                Err(e) => {
                    ctx.emit_error(DecodeError::conversion(val, e));
                    return Ok(Self::default());
                }
            },
            knuffel::ast::Literal::Decimal(ref value) => match f64::try_from(value) {
                Ok(v) => v,
                Err(e) => {
                    ctx.emit_error(DecodeError::conversion(val, e));
                    return Ok(Self::default());
                }
            },
            _ => {
                ctx.emit_error(DecodeError::unsupported(
                    val,
                    "Unsupported value, only numbers are recognized",
                ));
                return Ok(Self::default());
            }
        };

        if !Self::in_range(value) {
            ctx.emit_error(DecodeError::conversion(
                val,
                format!("value must be between {MIN} and {MAX}"),
            ));
            return Ok(Self::default());
        }

        Ok(Self(value))
    }
}
