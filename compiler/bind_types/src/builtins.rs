//! Built-in members of `String` and `List` receivers.

use bind_ir::{BuiltinMethod, Type};

const NO_PARAMS: &[Type] = &[];
const STR_PARAM: &[Type] = &[Type::Str];
const INT_PARAM: &[Type] = &[Type::INT];

const STRING_MEMBERS: &[BuiltinMethod] = &[
    BuiltinMethod::StrLength,
    BuiltinMethod::StrIsEmpty,
    BuiltinMethod::StrToUpperCase,
    BuiltinMethod::StrToLowerCase,
    BuiltinMethod::StrTrim,
    BuiltinMethod::StrContains,
    BuiltinMethod::StrCharAt,
];

const LIST_MEMBERS: &[BuiltinMethod] = &[
    BuiltinMethod::ListSize,
    BuiltinMethod::ListIsEmpty,
    BuiltinMethod::ListGet,
];

/// Built-in members available on a receiver type.
pub fn builtins_of(receiver: &Type) -> &'static [BuiltinMethod] {
    match receiver {
        Type::Str => STRING_MEMBERS,
        Type::List => LIST_MEMBERS,
        _ => &[],
    }
}

pub fn params(method: BuiltinMethod) -> &'static [Type] {
    match method {
        BuiltinMethod::StrContains => STR_PARAM,
        BuiltinMethod::StrCharAt | BuiltinMethod::ListGet => INT_PARAM,
        _ => NO_PARAMS,
    }
}

pub fn return_type(method: BuiltinMethod) -> Type {
    match method {
        BuiltinMethod::StrLength | BuiltinMethod::ListSize => Type::INT,
        BuiltinMethod::StrIsEmpty | BuiltinMethod::ListIsEmpty | BuiltinMethod::StrContains => {
            Type::BOOLEAN
        }
        BuiltinMethod::StrToUpperCase | BuiltinMethod::StrToLowerCase | BuiltinMethod::StrTrim => {
            Type::Str
        }
        BuiltinMethod::StrCharAt => Type::Prim(bind_ir::Prim::Char),
        BuiltinMethod::ListGet => Type::Object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures_agree_with_arity() {
        for method in STRING_MEMBERS.iter().chain(LIST_MEMBERS) {
            assert_eq!(params(*method).len(), method.arity(), "{}", method.name());
        }
        assert!(builtins_of(&Type::Object).is_empty());
        assert_eq!(return_type(BuiltinMethod::StrCharAt).to_string(), "char");
    }
}
