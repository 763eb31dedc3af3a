use parley::{
    AsValue, Connection, Error, ParameterRegistry, Statement, Value, ValueCell, converter, types,
};

pub async fn structs<C: Connection>(connection: &mut C) {
    let mut registry = ParameterRegistry::<C>::new();
    registry
        .register_input(1, ValueCell::new(3), Some(types::INTEGER), None)
        .expect("Failed to register x");
    registry
        .register_input(2, ValueCell::new(-4), Some(types::INTEGER), None)
        .expect("Failed to register y");
    let point = registry
        .register_output(3, types::STRUCT, Some("POINT".into()), None)
        .expect("Failed to register the point");
    let mut statement = Statement::create_procedure(connection, "test.make_point", 3)
        .await
        .expect("Failed to prepare test.make_point");
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.make_point");
    assert_eq!(
        point.get(),
        Value::Struct(
            Some(vec![Value::Int32(Some(3)), Value::Int32(Some(-4))]),
            "POINT".into()
        )
    );

    // Decoded into a native representation
    let decoder = converter(|_: &C, v: Value| match v {
        Value::Struct(Some(fields), ..) => {
            let coordinates = fields
                .into_iter()
                .map(i32::try_from_value)
                .collect::<parley::Result<Vec<_>>>()?;
            Ok(format!("{:?}", coordinates).as_value())
        }
        v => Err(Error::msg(format!("Unexpected value {v}"))),
    });
    let point = registry
        .register_output(3, types::STRUCT, Some("POINT".into()), Some(decoder))
        .expect("Failed to update the point");
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.make_point with a decoder");
    assert_eq!(point.get_as::<String>().expect("Point is not a string"), "[3, -4]");
}
