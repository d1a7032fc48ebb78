//! 测试支撑：断言宏、用例宏与环境守卫
