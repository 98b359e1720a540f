#[pinky::ghost(rename = "Phantom")]
mod samples {
    pub trait IWithIntMethod {
        fn int_method(&self) -> i32;
    }

    pub struct Real;

    impl IWithIntMethod for Real {
        fn int_method(&self) -> i32 {
            1
        }
    }

    pub fn run(value: &dyn IWithIntMethod) -> i32 {
        value.int_method() + 1
    }

    #[test]
    fn test1() {
        let instance = Phantom::of::<dyn IWithIntMethod>();
        instance.int_method().returns(41);

        assert_eq!(run(&*instance), 42);
    }
}

fn main() {
    assert_eq!(samples::run(&samples::Real), 2);
}
