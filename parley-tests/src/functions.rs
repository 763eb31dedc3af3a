use parley::{Connection, ParameterRegistry, Statement, ValueCell, types};

pub async fn functions<C: Connection>(connection: &mut C) {
    let mut registry = ParameterRegistry::<C>::new();
    let length = registry
        .register_output(1, types::INTEGER, None, None)
        .expect("Failed to register the result");
    let text = ValueCell::new("parley");
    registry
        .register_input(2, text.clone(), Some(types::VARCHAR), None)
        .expect("Failed to register the input 2");
    let mut statement = Statement::create_function(connection, "test.length", registry.len())
        .await
        .expect("Failed to prepare test.length");
    assert_eq!(statement.sql(), Some("{? = call test.length(?)}"));
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.length");
    assert_eq!(length.get_as::<i32>().expect("Length is not an integer"), 6);

    text.set("città");
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.length again");
    assert_eq!(length.get_as::<i32>().expect("Length is not an integer"), 5);

    #[cfg(not(feature = "disable-named-parameters"))]
    {
        let mut registry = ParameterRegistry::<C>::new();
        registry
            .register_input("text", ValueCell::new(""), None, None)
            .expect("Failed to register the input text");
        let length = registry
            .register_output(1, types::INTEGER, None, None)
            .expect("Failed to register the result");
        let mut statement = Statement::create_function(connection, "test.length", 2)
            .await
            .expect("Failed to prepare test.length");
        registry
            .call(connection, &mut statement)
            .await
            .expect("Failed to call test.length with a named input");
        assert_eq!(length.get_as::<i32>().expect("Length is not an integer"), 0);
    }
}
