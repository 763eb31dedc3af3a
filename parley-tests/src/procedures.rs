use crate::silent_logs;
use parley::{Connection, ParameterRegistry, Statement, Value, ValueCell, types};

pub async fn procedures<C: Connection>(connection: &mut C) {
    // Positional
    let mut registry = ParameterRegistry::<C>::new();
    let a = ValueCell::new(40);
    registry
        .register_input(1, a.clone(), Some(types::INTEGER), None)
        .expect("Failed to register the input 1");
    registry
        .register_input(2, ValueCell::new(2), Some(types::INTEGER), None)
        .expect("Failed to register the input 2");
    let sum = registry
        .register_output(3, types::INTEGER, None, None)
        .expect("Failed to register the output 3");
    assert_eq!(registry.len(), 3);
    let mut statement = Statement::create_procedure(connection, "test.add", registry.len())
        .await
        .expect("Failed to prepare test.add");
    assert_eq!(statement.sql(), Some("{call test.add(?,?,?)}"));
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.add");
    assert_eq!(sum.get(), Value::Int32(Some(42)));

    // Reused with a different input
    a.set(100);
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.add again");
    assert_eq!(sum.get_as::<i32>().expect("Sum is not an integer"), 102);

    // Missing input
    let mut registry = ParameterRegistry::<C>::new();
    registry
        .register_input(1, ValueCell::new(1), Some(types::INTEGER), None)
        .expect("Failed to register the input 1");
    let sum = registry
        .register_output(3, types::INTEGER, None, None)
        .expect("Failed to register the output 3");
    let mut statement = Statement::create_procedure(connection, "test.add", 3)
        .await
        .expect("Failed to prepare test.add");
    silent_logs! {
        assert!(
            registry.call(connection, &mut statement).await.is_err(),
            "Calling test.add without the second input must fail"
        );
    }
    assert_eq!(sum.get(), Value::Null, "The output must not be touched");

    // No parameters
    let registry = ParameterRegistry::<C>::new();
    let mut statement = Statement::create_procedure(connection, "test.noop", 0)
        .await
        .expect("Failed to prepare test.noop");
    assert_eq!(statement.sql(), Some("{call test.noop()}"));
    registry
        .call(connection, &mut statement)
        .await
        .expect("Failed to call test.noop");

    #[cfg(not(feature = "disable-named-parameters"))]
    {
        // Nominal
        let mut registry = ParameterRegistry::<C>::new();
        let name = ValueCell::new("world");
        registry
            .register_input("name", name.clone(), None, None)
            .expect("Failed to register the input name");
        let greeting = registry
            .register_output("greeting", types::VARCHAR, None, None)
            .expect("Failed to register the output greeting");
        let mut statement = Statement::create_procedure(connection, "test.greet", 2)
            .await
            .expect("Failed to prepare test.greet");
        registry
            .call(connection, &mut statement)
            .await
            .expect("Failed to call test.greet");
        assert_eq!(
            greeting.get_as::<String>().expect("Greeting is not a string"),
            "Hello, world!"
        );
        name.set("Parley");
        registry
            .call(connection, &mut statement)
            .await
            .expect("Failed to call test.greet again");
        assert_eq!(greeting.get(), Value::Varchar(Some("Hello, Parley!".into())));

        // Mixed
        let mut registry = ParameterRegistry::<C>::new();
        registry
            .register_input("b", ValueCell::new(-5), Some(types::INTEGER), None)
            .expect("Failed to register the input b");
        registry
            .register_input("a", ValueCell::new(8), Some(types::INTEGER), None)
            .expect("Failed to register the input a");
        let sum = registry
            .register_output(3, types::INTEGER, None, None)
            .expect("Failed to register the output 3");
        let mut statement = Statement::create_procedure(connection, "test.add", 3)
            .await
            .expect("Failed to prepare test.add");
        registry
            .call(connection, &mut statement)
            .await
            .expect("Failed to call test.add with mixed parameters");
        assert_eq!(sum.get_as::<i64>().expect("Sum is not an integer"), 3);
    }
}
