#[pinky::ghost(rename = "Phantom")]
mod renamed_dispatcher {
    pub trait IWithIntMethod {
        fn int_method(&self) -> i32;
    }

    #[test]
    fn test1() {
        let instance = Phantom::of::<dyn IWithIntMethod>();
        instance.int_method().returns(3);

        assert_eq!(instance.int_method(), 3);
        Phantom::received(&instance, 1).int_method();
    }
}

#[pinky::ghost(returns = "will_return")]
mod renamed_configuration {
    pub trait IWithIntMethod {
        fn int_method(&self) -> i32;
    }

    #[test]
    fn test1() {
        let instance = Ghost::of::<dyn IWithIntMethod>();
        instance.int_method().will_return(5);

        assert_eq!(instance.int_method(), 5);
    }
}

#[pinky::ghost(rename = "Spectre", returns = "yields")]
mod renamed_both {
    pub trait IWithStringMethod {
        fn string_method(&self) -> String;
    }

    #[test]
    fn test1() {
        let instance = Spectre::of::<dyn IWithStringMethod>();
        instance.string_method().yields("boo");

        assert_eq!(instance.string_method(), "boo");
        Spectre::received(&instance, 1).string_method();
    }
}
