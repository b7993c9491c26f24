//! ABI encoding of constructor arguments given as JSON values.

use {
    alloy::{
        dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
        json_abi::{JsonAbi, Param},
        primitives::Bytes,
    },
    anyhow::{Context, Result, bail, ensure},
    serde_json::Value,
};

/// Encodes `args` for the constructor declared in `abi`. The result is meant
/// to be appended to the contract's creation code.
pub fn encode_constructor_args(abi: &JsonAbi, args: &[Value]) -> Result<Bytes> {
    let Some(constructor) = &abi.constructor else {
        ensure!(
            args.is_empty(),
            "contract has no constructor but {} arguments are configured",
            args.len()
        );
        return Ok(Bytes::new());
    };
    ensure!(
        constructor.inputs.len() == args.len(),
        "constructor takes {} arguments but {} are configured",
        constructor.inputs.len(),
        args.len()
    );

    let values = constructor
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| coerce_param(param, arg))
        .collect::<Result<Vec<_>>>()?;
    Ok(constructor.abi_encode_input(&values)?.into())
}

fn coerce_param(param: &Param, arg: &Value) -> Result<DynSolValue> {
    let ty: DynSolType = param
        .resolve()
        .with_context(|| format!("unsupported parameter type {}", param.ty))?;
    coerce(&ty, arg).with_context(|| {
        format!(
            "invalid value {arg} for constructor parameter {:?} of type {}",
            param.name, param.ty
        )
    })
}

/// Converts a JSON value into a value of type `ty`. Scalars are parsed from
/// their string form, so integers too large for a JSON number can be given as
/// strings.
fn coerce(ty: &DynSolType, value: &Value) -> Result<DynSolValue> {
    match (ty, value) {
        (DynSolType::Array(inner), Value::Array(items)) => Ok(DynSolValue::Array(
            items
                .iter()
                .map(|item| coerce(inner, item))
                .collect::<Result<_>>()?,
        )),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            ensure!(items.len() == *len, "expected {len} items, got {}", items.len());
            Ok(DynSolValue::FixedArray(
                items
                    .iter()
                    .map(|item| coerce(inner, item))
                    .collect::<Result<_>>()?,
            ))
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            ensure!(
                items.len() == types.len(),
                "expected {} tuple components, got {}",
                types.len(),
                items.len()
            );
            Ok(DynSolValue::Tuple(
                types
                    .iter()
                    .zip(items)
                    .map(|(ty, item)| coerce(ty, item))
                    .collect::<Result<_>>()?,
            ))
        }
        (_, Value::String(string)) => Ok(ty.coerce_str(string)?),
        (_, Value::Number(_) | Value::Bool(_)) => Ok(ty.coerce_str(&value.to_string())?),
        (_, Value::Array(_)) => bail!("arrays can't be converted to {}", ty.sol_type_name()),
        (_, Value::Object(_)) => bail!("objects are not supported, use an array for tuples"),
        (_, Value::Null) => bail!("null is not a valid {}", ty.sol_type_name()),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{U256, address},
        serde_json::json,
    };

    fn abi(inputs: Value) -> JsonAbi {
        serde_json::from_value(json!([{
            "type": "constructor",
            "inputs": inputs,
            "stateMutability": "nonpayable",
        }]))
        .unwrap()
    }

    fn param(name: &str, ty: &str) -> Value {
        json!({ "name": name, "type": ty, "internalType": ty })
    }

    #[test]
    fn encodes_scalars() {
        let abi = abi(json!([
            param("supply", "uint256"),
            param("owner", "address"),
            param("name", "string"),
            param("paused", "bool"),
        ]));

        let encoded = encode_constructor_args(
            &abi,
            &[
                json!(42),
                json!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
                json!("Skill"),
                json!(true),
            ],
        )
        .unwrap();

        let expected = DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(42), 256),
            DynSolValue::Address(address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")),
            DynSolValue::String("Skill".to_owned()),
            DynSolValue::Bool(true),
        ])
        .abi_encode_params();
        assert_eq!(encoded, Bytes::from(expected));
    }

    #[test]
    fn large_numbers_can_be_given_as_strings() {
        let abi = abi(json!([param("cap", "uint256")]));

        let encoded =
            encode_constructor_args(&abi, &[json!("1000000000000000000000000")]).unwrap();

        assert_eq!(
            encoded[..],
            U256::from(10u64).pow(U256::from(24)).to_be_bytes::<32>()[..]
        );
    }

    #[test]
    fn encodes_arrays_and_tuples() {
        let abi = abi(json!([
            param("owners", "address[]"),
            param("limits", "uint8[2]"),
            {
                "name": "config",
                "type": "tuple",
                "components": [param("fee", "uint16"), param("label", "string")],
            },
        ]));

        let encoded = encode_constructor_args(
            &abi,
            &[
                json!([
                    "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                    "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
                ]),
                json!([1, 2]),
                json!([30, "standard"]),
            ],
        )
        .unwrap();

        let expected = DynSolValue::Tuple(vec![
            DynSolValue::Array(vec![
                DynSolValue::Address(address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")),
                DynSolValue::Address(address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512")),
            ]),
            DynSolValue::FixedArray(vec![
                DynSolValue::Uint(U256::from(1), 8),
                DynSolValue::Uint(U256::from(2), 8),
            ]),
            DynSolValue::Tuple(vec![
                DynSolValue::Uint(U256::from(30), 16),
                DynSolValue::String("standard".to_owned()),
            ]),
        ])
        .abi_encode_params();
        assert_eq!(encoded, Bytes::from(expected));
    }

    #[test]
    fn no_constructor_and_no_args_encodes_nothing() {
        let abi = JsonAbi::default();

        assert!(encode_constructor_args(&abi, &[]).unwrap().is_empty());
        assert!(encode_constructor_args(&abi, &[json!(1)]).is_err());
    }

    #[test]
    fn rejects_wrong_arity_and_types() {
        let abi = abi(json!([param("owner", "address")]));

        assert!(encode_constructor_args(&abi, &[]).is_err());
        assert!(encode_constructor_args(&abi, &[json!("0x01"), json!(2)]).is_err());
        assert!(encode_constructor_args(&abi, &[json!("not an address")]).is_err());
        assert!(encode_constructor_args(&abi, &[json!({ "owner": "0x01" })]).is_err());
        assert!(encode_constructor_args(&abi, &[Value::Null]).is_err());
    }
}
