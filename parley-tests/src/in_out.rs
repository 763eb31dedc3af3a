use parley::{
    AsValue, Connection, ParameterRegistry, Statement, Value, ValueCell, converter, types,
};

pub async fn in_out<C: Connection>(connection: &mut C) {
    // Same cell for input and output
    let mut registry = ParameterRegistry::<C>::new();
    let value = registry
        .register_in_out(1, ValueCell::new(21), types::INTEGER, None, None, None)
        .expect("Failed to register the in-out parameter");
    let mut statement = Statement::create_procedure(connection, "test.twice", 1)
        .await
        .expect("Failed to prepare test.twice");
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.twice");
    assert_eq!(value.get(), Value::Int32(Some(42)));
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.twice again");
    assert_eq!(value.get(), Value::Int32(Some(84)));

    // Input and output registered separately, merged into one parameter
    let mut registry = ParameterRegistry::<C>::new();
    let input = ValueCell::new(5);
    registry
        .register_input(1, input.clone(), Some(types::INTEGER), None)
        .expect("Failed to register the input side");
    let output = registry
        .register_output(1, types::INTEGER, None, None)
        .expect("Failed to register the output side");
    assert_eq!(registry.len(), 1);
    let parameter = registry.get(1).expect("Parameter 1 is missing");
    assert!(parameter.is_in_out());
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.twice with separate cells");
    assert_eq!(input.get(), Value::Int32(Some(5)));
    assert_eq!(output.get(), Value::Int32(Some(10)));

    // Converters
    let mut registry = ParameterRegistry::<C>::new();
    let encoder = converter(|_: &C, v: Value| Ok((i32::try_from_value(v)? + 1).as_value()));
    let decoder = converter(|_: &C, v: Value| Ok((i64::try_from_value(v)? * 100).as_value()));
    let value = registry
        .register_in_out(
            1,
            ValueCell::new(1),
            types::INTEGER,
            None,
            Some(encoder),
            Some(decoder),
        )
        .expect("Failed to register the in-out parameter");
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.twice with converters");
    assert_eq!(value.get(), Value::Int64(Some(400)));
}
